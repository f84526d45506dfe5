/*!
Line-oriented command interpreter driving the role modules.

One command per line, words separated by whitespace; a word starting with `#`
begins a comment.
Every command answers with a single JSON line: `{"success":true,...}` on
success or `{"error":"<Kind>","message":"..."}` on failure. Commands run as
whoever logged in last, and each role only gets its own commands.
*/
use std::io::{BufRead, Write};

use chrono::NaiveDate;
use serde::Serialize;

use crate::err::{Error, Maybe};
use crate::models::{Course, Enrollment, Grade, NewCourse, NewUser, Role, User};
use crate::store::Store;
use crate::{admin, auth, professor, student};

pub static USAGE: &str = "\
login <id> <password>
logout
whoami
add-student <id> <name> <password> <branch> [cgpa] [YYYY-MM-DD]
add-professor <id> <name> <password> <branch>
remove-user <id>
users [student|professor|admin]
add-course <id> <coordinator> <name...>
remove-course <id>
courses
register <course>
grades
registrations
pending
approve <enrollment-id>
approve <student> <course>
grade <student> <course> <value...>
roster <course>";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reply {
    User(User),
    Users(Vec<User>),
    Course(Course),
    Courses(Vec<Course>),
    Enrollment(Enrollment),
    Enrollments(Vec<Enrollment>),
    Grade(Grade),
    Grades(Vec<Grade>),
    Info(String),
}

pub struct Shell {
    store: Store,
    session: Option<String>,
}

fn usage(form: &str) -> Error {
    Error::invalid_payload(format!("usage: {}", form))
}

fn arg<'a>(args: &[&'a str], n: usize, form: &str) -> Result<&'a str, Error> {
    args.get(n).copied().ok_or_else(|| usage(form))
}

/// Refuse trailing words a command has no use for.
fn at_most(args: &[&str], n: usize, form: &str) -> Result<(), Error> {
    if args.len() > n {
        return Err(usage(form));
    }
    Ok(())
}

/// Cut a comment off `line`. A `#` only starts one at the beginning of the
/// line or right after whitespace, so values like `C#` survive.
fn strip_comment(line: &str) -> &str {
    let mut after_blank = true;
    for (i, c) in line.char_indices() {
        if c == '#' && after_blank {
            return &line[..i];
        }
        after_blank = c.is_whitespace();
    }
    line
}

impl Shell {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            session: None,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Id of the logged-in user, provided it still exists with `role`.
    fn acting_as(&self, role: Role) -> Result<String, Error> {
        let id = self
            .session
            .as_deref()
            .ok_or_else(|| Error::unauthorized("Not logged in."))?;
        auth::require_role(&self.store, id, role)?;
        Ok(id.to_owned())
    }

    /// Run one line. Blank lines and comments give `None`.
    pub fn execute(&mut self, line: &str) -> Option<Maybe<Reply>> {
        let words: Vec<&str> = strip_comment(line).split_whitespace().collect();
        let (cmd, args) = words.split_first()?;

        log::debug!("shell: {} {:?}", cmd, args);
        let res = self.dispatch(cmd, args);
        if let Err(e) = &res {
            log::warn!("{} failed: {}", cmd, e);
        }
        Some(res.into())
    }

    fn dispatch(&mut self, cmd: &str, args: &[&str]) -> Result<Reply, Error> {
        match cmd {
            "login" => {
                let form = "login <id> <password>";
                at_most(args, 2, form)?;
                let user = auth::login(&self.store, arg(args, 0, form)?, arg(args, 1, form)?)?;
                self.session = Some(user.id().to_owned());
                Ok(Reply::User(user))
            }
            "logout" => {
                at_most(args, 0, "logout")?;
                match self.session.take() {
                    Some(id) => Ok(Reply::Info(format!("{} logged out.", id))),
                    None => Err(Error::unauthorized("Not logged in.")),
                }
            }
            "whoami" => {
                at_most(args, 0, "whoami")?;
                let id = self
                    .session
                    .as_deref()
                    .ok_or_else(|| Error::unauthorized("Not logged in."))?;
                Ok(Reply::User(self.store.users.fetch(id)?.clone()))
            }

            "add-student" => {
                self.acting_as(Role::Admin)?;
                let form = "add-student <id> <name> <password> <branch> [cgpa] [YYYY-MM-DD]";
                at_most(args, 6, form)?;
                let mut data = NewUser::student(
                    arg(args, 0, form)?,
                    arg(args, 1, form)?,
                    arg(args, 2, form)?,
                    arg(args, 3, form)?,
                );
                if let Some(cgpa) = args.get(4) {
                    data.cgpa = Some(cgpa.parse().map_err(|_| {
                        Error::invalid_payload(format!("{:?} is not a valid cgpa", cgpa))
                    })?);
                }
                if let Some(date) = args.get(5) {
                    data.date_of_admission =
                        Some(NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
                            Error::invalid_payload(format!("{:?} is not a date: {}", date, e))
                        })?);
                }
                admin::add_user(&mut self.store, data).map(Reply::User)
            }
            "add-professor" => {
                self.acting_as(Role::Admin)?;
                let form = "add-professor <id> <name> <password> <branch>";
                at_most(args, 4, form)?;
                let data = NewUser::professor(
                    arg(args, 0, form)?,
                    arg(args, 1, form)?,
                    arg(args, 2, form)?,
                    arg(args, 3, form)?,
                );
                admin::add_user(&mut self.store, data).map(Reply::User)
            }
            "remove-user" => {
                self.acting_as(Role::Admin)?;
                at_most(args, 1, "remove-user <id>")?;
                let id = arg(args, 0, "remove-user <id>")?;
                admin::remove_user(&mut self.store, id).map(Reply::User)
            }
            "users" => {
                self.acting_as(Role::Admin)?;
                at_most(args, 1, "users [student|professor|admin]")?;
                let role = match args.first() {
                    Some(r) => Some(r.parse::<Role>().map_err(Error::invalid_payload)?),
                    None => None,
                };
                Ok(Reply::Users(admin::list_users(&self.store, role)))
            }
            "add-course" => {
                self.acting_as(Role::Admin)?;
                let form = "add-course <id> <coordinator> <name...>";
                let id = arg(args, 0, form)?;
                let coordinator = arg(args, 1, form)?;
                let name = args.get(2..).unwrap_or_default().join(" ");
                admin::add_course(&mut self.store, NewCourse::new(id, &name, coordinator))
                    .map(Reply::Course)
            }
            "remove-course" => {
                self.acting_as(Role::Admin)?;
                at_most(args, 1, "remove-course <id>")?;
                let id = arg(args, 0, "remove-course <id>")?;
                admin::remove_course(&mut self.store, id).map(Reply::Course)
            }

            "courses" => {
                self.acting_as(Role::Student)?;
                at_most(args, 0, "courses")?;
                Ok(Reply::Courses(student::view_courses(&self.store)))
            }
            "register" => {
                let me = self.acting_as(Role::Student)?;
                at_most(args, 1, "register <course>")?;
                let course = arg(args, 0, "register <course>")?;
                student::register_course(&mut self.store, &me, course).map(Reply::Enrollment)
            }
            "grades" => {
                let me = self.acting_as(Role::Student)?;
                at_most(args, 0, "grades")?;
                Ok(Reply::Grades(student::view_grades(&self.store, &me)))
            }
            "registrations" => {
                let me = self.acting_as(Role::Student)?;
                at_most(args, 0, "registrations")?;
                Ok(Reply::Enrollments(student::view_registered_courses(
                    &self.store,
                    &me,
                )))
            }

            "pending" => {
                let me = self.acting_as(Role::Professor)?;
                at_most(args, 0, "pending")?;
                Ok(Reply::Enrollments(professor::view_pending_registrations(
                    &self.store,
                    &me,
                )))
            }
            "approve" => {
                let me = self.acting_as(Role::Professor)?;
                match args {
                    [enrollment_id] => {
                        professor::approve_registration(&mut self.store, &me, enrollment_id)
                    }
                    [student_id, course_id] => professor::approve_registration_for(
                        &mut self.store,
                        &me,
                        student_id,
                        course_id,
                    ),
                    _ => Err(usage("approve <enrollment-id> | approve <student> <course>")),
                }
                .map(Reply::Enrollment)
            }
            "grade" => {
                let me = self.acting_as(Role::Professor)?;
                let form = "grade <student> <course> <value...>";
                let student_id = arg(args, 0, form)?;
                let course_id = arg(args, 1, form)?;
                arg(args, 2, form)?;
                let value = args[2..].join(" ");
                professor::upload_grade(&mut self.store, &me, student_id, course_id, &value)
                    .map(Reply::Grade)
            }
            "roster" => {
                let me = self.acting_as(Role::Professor)?;
                at_most(args, 1, "roster <course>")?;
                let course = arg(args, 0, "roster <course>")?;
                professor::view_enrolled_students(&self.store, &me, course).map(Reply::Users)
            }

            "help" => {
                at_most(args, 0, "help")?;
                Ok(Reply::Info(USAGE.to_owned()))
            }
            x => Err(Error::invalid_payload(format!(
                "{:?} is not a recognized command; try `help`.",
                x
            ))),
        }
    }

    /// Execute every line of `input`, writing one JSON answer per command.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> anyhow::Result<()> {
        for line in input.lines() {
            let line = line?;
            if let Some(answer) = self.execute(&line) {
                serde_json::to_writer(&mut output, &answer)?;
                writeln!(output)?;
            }
        }
        output.flush()?;
        Ok(())
    }
}
