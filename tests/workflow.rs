use std::path::PathBuf;

use college_erp::config::{self, Cfg};
use college_erp::models::EnrollmentStatus;
use college_erp::shell::Shell;

fn demo_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

fn demo_shell() -> Shell {
    let cfg = Cfg::from_file(demo_path("erp.toml")).unwrap();
    Shell::new(config::bootstrap(&cfg).unwrap())
}

/// Run `script` and parse each output line.
fn run(shell: &mut Shell, script: &str) -> Vec<serde_json::Value> {
    let mut out: Vec<u8> = Vec::new();
    shell.run(script.as_bytes(), &mut out).unwrap();
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn demo_config_seeds_the_store() {
    let shell = demo_shell();
    let store = shell.store();
    assert_eq!(store.users.len(), 5);
    assert_eq!(store.courses.len(), 2);
    assert!(store.enrollments.is_empty());
}

#[test]
fn walkthrough_script() {
    let mut shell = demo_shell();
    let script = std::fs::read_to_string(demo_path("walkthrough.txt")).unwrap();
    let answers = run(&mut shell, &script);

    let errors: Vec<&str> = answers
        .iter()
        .filter_map(|a| a["error"].as_str())
        .collect();
    assert_eq!(errors, vec!["Duplicate", "Unauthorized", "InvalidState"]);

    let last = answers.last().unwrap();
    let regs = last["enrollments"].as_array().unwrap();
    assert_eq!(regs.len(), 1);
    assert_eq!(regs[0]["status"], "Enrolled");

    let grades = &answers[answers.len() - 2]["grades"];
    assert_eq!(grades.as_array().unwrap().len(), 1);
    assert_eq!(grades[0]["grade_value"], "A+");
}

#[test]
fn other_professor_leaves_state_untouched() {
    let mut shell = demo_shell();
    let answers = run(
        &mut shell,
        "login stud_a stud_pass_a\n\
         register SUBJ-X\n\
         login prof_b prof_pass_b\n\
         approve stud_a SUBJ-X\n\
         grade stud_a SUBJ-X F\n\
         roster SUBJ-X\n\
         pending\n",
    );

    for a in &answers[3..6] {
        assert_eq!(a["error"], "Unauthorized");
    }
    assert_eq!(answers[6]["enrollments"].as_array().unwrap().len(), 0);

    let store = shell.store();
    assert!(store.grades.is_empty());
    let e = store.enrollments.values().next().unwrap();
    assert_eq!(e.status, EnrollmentStatus::Pending);
}

#[test]
fn approve_by_enrollment_id_then_regrade() {
    let mut shell = demo_shell();
    let answers = run(&mut shell, "login stud_b stud_pass_b\nregister SUBJ-Y\n");
    let id = answers[1]["enrollment"]["enrollment_id"]
        .as_str()
        .unwrap()
        .to_owned();

    let script = format!(
        "login prof_b prof_pass_b\napprove {}\ngrade stud_b SUBJ-Y C\ngrade stud_b SUBJ-Y B\n",
        id
    );
    let answers = run(&mut shell, &script);
    assert_eq!(answers[1]["enrollment"]["status"], "Enrolled");
    assert_eq!(
        answers[2]["grade"]["grade_id"],
        answers[3]["grade"]["grade_id"]
    );

    let grades: Vec<_> = shell
        .store()
        .grades
        .values()
        .map(|g| g.grade_value.clone())
        .collect();
    assert_eq!(grades, vec!["B".to_owned()]);
}

#[test]
fn admin_manages_users() {
    let mut shell = demo_shell();
    let answers = run(
        &mut shell,
        "login admin_user admin_pass\n\
         remove-user admin_user\n\
         remove-user stud_z\n\
         remove-user stud_b\n\
         login stud_b stud_pass_b\n",
    );
    assert_eq!(answers[1]["error"], "Unauthorized");
    assert_eq!(answers[2]["error"], "NotFound");
    assert_eq!(answers[3]["user"]["user_id"], "stud_b");
    assert_eq!(answers[4]["error"], "InvalidCredentials");
}
