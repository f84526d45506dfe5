/*!
Start-up configuration and demo data.

The config file is TOML; every key is optional:

```toml
admin_id = "admin"
admin_name = "Admin"
admin_password = "admin"
seed_file = "seed.json"
```

The seed file is JSON holding `users` and `courses` arrays in the same shape
`admin::add_user()` and `admin::add_course()` accept. Relative `seed_file`
paths resolve against the config file's directory.
*/
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::admin;
use crate::models::{NewCourse, NewUser, User};
use crate::store::Store;

#[derive(Deserialize)]
struct ConfigFile {
    admin_id: Option<String>,
    admin_name: Option<String>,
    admin_password: Option<String>,
    seed_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cfg {
    pub admin_id: String,
    pub admin_name: String,
    pub admin_password: String,
    pub seed_file: Option<PathBuf>,
}

impl Default for Cfg {
    fn default() -> Self {
        Self {
            admin_id: "admin".to_owned(),
            admin_name: "Admin".to_owned(),
            admin_password: "admin".to_owned(),
            seed_file: None,
        }
    }
}

impl Cfg {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read config file {}", path.display()))?;
        let mut c = Self::from_toml(&contents)
            .with_context(|| format!("Unable to parse config file {}", path.display()))?;

        if let Some(seed) = c.seed_file.take() {
            let seed = match path.parent() {
                Some(dir) if seed.is_relative() => dir.join(seed),
                _ => seed,
            };
            c.seed_file = Some(seed);
        }

        Ok(c)
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let cf: ConfigFile = toml::from_str(contents)?;
        let mut c = Self::default();

        if let Some(s) = cf.admin_id {
            c.admin_id = s;
        }
        if let Some(s) = cf.admin_name {
            c.admin_name = s;
        }
        if let Some(s) = cf.admin_password {
            c.admin_password = s;
        }
        c.seed_file = cf.seed_file;

        Ok(c)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub users: Vec<NewUser>,
    #[serde(default)]
    pub courses: Vec<NewCourse>,
}

impl Seed {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read seed file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Unable to parse seed file {}", path.display()))
    }

    /// Add users first so courses can find their coordinators.
    pub fn apply(self, store: &mut Store) -> anyhow::Result<()> {
        log::debug!(
            "Seeding {} user(s), {} course(s).",
            self.users.len(),
            self.courses.len()
        );

        for u in self.users {
            let id = u.user_id.clone().unwrap_or_default();
            admin::add_user(store, u).with_context(|| format!("Seeding user {:?}", id))?;
        }
        for c in self.courses {
            let id = c.course_id.clone().unwrap_or_default();
            admin::add_course(store, c).with_context(|| format!("Seeding course {:?}", id))?;
        }

        Ok(())
    }
}

/// A store holding the configured admin plus whatever the seed file adds.
pub fn bootstrap(cfg: &Cfg) -> anyhow::Result<Store> {
    let mut store = Store::new();
    store
        .users
        .insert(User::admin(&cfg.admin_id, &cfg.admin_name, &cfg.admin_password))?;
    log::info!("Admin account {:?} created.", &cfg.admin_id);

    if let Some(path) = &cfg.seed_file {
        Seed::from_file(path)?.apply(&mut store)?;
        log::info!("Seed data loaded from {}.", path.display());
    }

    Ok(store)
}
