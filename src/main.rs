use std::fs::File;
use std::io::{self, BufReader};

use anyhow::{bail, Context};

use college_erp::config::{self, Cfg};
use college_erp::shell::{Shell, USAGE};

struct Args {
    config: Option<String>,
    script: Option<String>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        config: None,
        script: None,
    };

    let mut it = std::env::args().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--script" => match it.next() {
                Some(path) => args.script = Some(path),
                None => bail!("--script needs a file path"),
            },
            "-h" | "--help" => {
                println!(
                    "usage: college-erp [config.toml] [--script <file>]\n\ncommands:\n{}",
                    USAGE
                );
                std::process::exit(0);
            }
            _ if args.config.is_none() => args.config = Some(a),
            _ => bail!("unexpected argument {:?}", a),
        }
    }

    Ok(args)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = parse_args()?;

    let cfg = match &args.config {
        Some(path) => Cfg::from_file(path)?,
        None => Cfg::default(),
    };
    log::info!("Configuration:\n{:#?}", &cfg);

    let store = config::bootstrap(&cfg)?;
    let mut shell = Shell::new(store);

    let stdout = io::stdout();
    match &args.script {
        Some(path) => {
            let f = File::open(path).with_context(|| format!("Unable to open script {}", path))?;
            shell.run(BufReader::new(f), stdout.lock())
        }
        None => shell.run(io::stdin().lock(), stdout.lock()),
    }
}
