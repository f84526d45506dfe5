use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Professor,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let token = match self {
            Role::Student => "Student",
            Role::Professor => "Professor",
            Role::Admin => "Admin",
        };

        write!(f, "{}", token)
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "professor" => Ok(Role::Professor),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("{:?} is not a valid Role.", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseUser {
    pub user_id: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessorData {
    #[serde(flatten)]
    pub base: BaseUser,
    pub branch: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentData {
    #[serde(flatten)]
    pub base: BaseUser,
    pub branch: String,
    pub cgpa: f32,
    pub date_of_admission: NaiveDate,
}

/// Every account in the system. The role is the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum User {
    Admin(BaseUser),
    Professor(ProfessorData),
    Student(StudentData),
}

impl User {
    pub fn admin(user_id: &str, name: &str, password: &str) -> User {
        User::Admin(BaseUser {
            user_id: user_id.to_owned(),
            name: name.to_owned(),
            password: password.to_owned(),
        })
    }

    fn base(&self) -> &BaseUser {
        match self {
            User::Admin(base) => base,
            User::Professor(p) => &p.base,
            User::Student(s) => &s.base,
        }
    }

    pub fn id(&self) -> &str {
        &self.base().user_id
    }

    pub fn name(&self) -> &str {
        &self.base().name
    }

    pub fn role(&self) -> Role {
        match self {
            User::Admin(_) => Role::Admin,
            User::Professor(_) => Role::Professor,
            User::Student(_) => Role::Student,
        }
    }

    /// Plaintext, case-sensitive comparison.
    pub fn check_password(&self, password: &str) -> bool {
        self.base().password == password
    }

    pub fn branch(&self) -> Option<&str> {
        match self {
            User::Admin(_) => None,
            User::Professor(p) => Some(&p.branch),
            User::Student(s) => Some(&s.branch),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub course_id: String,
    pub name: String,
    /// `user_id` of the coordinating professor.
    pub coordinator_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrollmentStatus {
    Pending,
    Enrolled,
    /// Never produced by any operation; kept so stored data can carry it.
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub enrollment_id: String,
    pub student_id: String,
    pub course_id: String,
    pub status: EnrollmentStatus,
}

impl Enrollment {
    pub fn pending(student_id: &str, course_id: &str) -> Enrollment {
        Enrollment {
            enrollment_id: Uuid::new_v4().to_string(),
            student_id: student_id.to_owned(),
            course_id: course_id.to_owned(),
            status: EnrollmentStatus::Pending,
        }
    }

    pub fn is_for(&self, student_id: &str, course_id: &str) -> bool {
        self.student_id == student_id && self.course_id == course_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub grade_id: String,
    pub student_id: String,
    pub course_id: String,
    /// Free-form, e.g. "A+" or "F".
    pub grade_value: String,
}

impl Grade {
    pub fn new(student_id: &str, course_id: &str, grade_value: &str) -> Grade {
        Grade {
            grade_id: Uuid::new_v4().to_string(),
            student_id: student_id.to_owned(),
            course_id: course_id.to_owned(),
            grade_value: grade_value.to_owned(),
        }
    }
}

/**
Input record for `admin::add_user()`.

Text fields left out of the JSON come through as empty strings; only
`user_id` and `role` are checked.
*/
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    pub user_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
    pub role: Option<Role>,
    #[serde(default)]
    pub branch: String,
    pub cgpa: Option<f32>,
    pub date_of_admission: Option<NaiveDate>,
}

impl NewUser {
    pub fn student(user_id: &str, name: &str, password: &str, branch: &str) -> NewUser {
        NewUser {
            user_id: Some(user_id.to_owned()),
            name: name.to_owned(),
            password: password.to_owned(),
            role: Some(Role::Student),
            branch: branch.to_owned(),
            ..Default::default()
        }
    }

    pub fn professor(user_id: &str, name: &str, password: &str, branch: &str) -> NewUser {
        NewUser {
            user_id: Some(user_id.to_owned()),
            name: name.to_owned(),
            password: password.to_owned(),
            role: Some(Role::Professor),
            branch: branch.to_owned(),
            ..Default::default()
        }
    }

    /// Build the record for `user_id`; `None` for roles that can't be created.
    pub fn into_user(self, user_id: String) -> Option<User> {
        let base = BaseUser {
            user_id,
            name: self.name,
            password: self.password,
        };

        match self.role? {
            Role::Student => Some(User::Student(StudentData {
                base,
                branch: self.branch,
                cgpa: self.cgpa.unwrap_or(0.0),
                date_of_admission: self
                    .date_of_admission
                    .unwrap_or_else(|| Utc::now().date_naive()),
            })),
            Role::Professor => Some(User::Professor(ProfessorData {
                base,
                branch: self.branch,
            })),
            Role::Admin => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCourse {
    pub course_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub coordinator_id: String,
}

impl NewCourse {
    pub fn new(course_id: &str, name: &str, coordinator_id: &str) -> NewCourse {
        NewCourse {
            course_id: Some(course_id.to_owned()),
            name: name.to_owned(),
            coordinator_id: coordinator_id.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("Professor".parse::<Role>(), Ok(Role::Professor));
        assert_eq!("student".parse::<Role>(), Ok(Role::Student));
        assert!("boss".parse::<Role>().is_err());
    }

    #[test]
    fn new_student_gets_defaults() {
        let before = Utc::now().date_naive();
        let u = NewUser::student("stud_c", "Student C", "pass", "Branch 1")
            .into_user("stud_c".to_owned())
            .unwrap();
        match u {
            User::Student(s) => {
                assert_eq!(s.cgpa, 0.0);
                let next = before.succ_opt().unwrap();
                assert!(s.date_of_admission == before || s.date_of_admission == next);
                assert_eq!(s.branch, "Branch 1");
            }
            other => panic!("expected a student, got {:?}", other),
        }
    }

    #[test]
    fn admins_are_not_built_from_input() {
        let data = NewUser {
            role: Some(Role::Admin),
            ..Default::default()
        };
        assert!(data.into_user("root".to_owned()).is_none());
    }

    #[test]
    fn user_json_hides_password() {
        let u = NewUser::professor("prof_c", "Professor C", "secret", "Branch 3")
            .into_user("prof_c".to_owned())
            .unwrap();
        let json = serde_json::to_value(&u).unwrap();
        assert_eq!(json["role"], "professor");
        assert_eq!(json["user_id"], "prof_c");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn new_user_reads_from_json() {
        let data: NewUser = serde_json::from_str(
            r#"{"user_id": "stud_c", "role": "student", "date_of_admission": "2023-08-01"}"#,
        )
        .unwrap();
        assert_eq!(data.role, Some(Role::Student));
        assert_eq!(data.name, "");
        assert_eq!(
            data.date_of_admission,
            NaiveDate::from_ymd_opt(2023, 8, 1)
        );
    }

    #[test]
    fn password_check_is_exact() {
        let u = User::admin("admin_user", "Admin", "admin_pass");
        assert!(u.check_password("admin_pass"));
        assert!(!u.check_password("ADMIN_PASS"));
        assert!(!u.check_password(""));
    }
}
