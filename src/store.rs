/*!
In-memory tables for users, courses, enrollments and grades.

No business rules live here; the role modules decide what may be written.
*/
use std::collections::BTreeMap;

use crate::err::Error;
use crate::models::{Course, Enrollment, Grade, User};

/// Anything that can be kept in a `Table`.
pub trait Record: Clone {
    /// What the record is called in error messages.
    const KIND: &'static str;

    fn key(&self) -> &str;
}

impl Record for User {
    const KIND: &'static str = "User";
    fn key(&self) -> &str {
        self.id()
    }
}

impl Record for Course {
    const KIND: &'static str = "Course";
    fn key(&self) -> &str {
        &self.course_id
    }
}

impl Record for Enrollment {
    const KIND: &'static str = "Enrollment";
    fn key(&self) -> &str {
        &self.enrollment_id
    }
}

impl Record for Grade {
    const KIND: &'static str = "Grade";
    fn key(&self) -> &str {
        &self.grade_id
    }
}

/// Records keyed by identifier, iterated in identifier order.
#[derive(Debug, Clone)]
pub struct Table<T> {
    rows: BTreeMap<String, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<T: Record> Table<T> {
    pub fn insert(&mut self, record: T) -> Result<&T, Error> {
        let key = record.key().to_owned();
        if self.rows.contains_key(&key) {
            return Err(Error::duplicate(format!(
                "{} with id `{}` already exists!",
                T::KIND,
                key
            )));
        }
        log::trace!("Table<{}>::insert( {:?} )", T::KIND, &key);
        Ok(&*self.rows.entry(key).or_insert(record))
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.rows.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.rows.get_mut(key)
    }

    /// Look up `key`, failing with `NotFound` when it's absent.
    pub fn fetch(&self, key: &str) -> Result<&T, Error> {
        self.rows.get(key).ok_or_else(|| {
            Error::not_found(format!("{} with id `{}` does not exist!", T::KIND, key))
        })
    }

    /// Replace the stored record carrying the same key.
    pub fn update(&mut self, record: T) -> Result<(), Error> {
        match self.rows.get_mut(record.key()) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(Error::not_found(format!(
                "{} with id `{}` does not exist!",
                T::KIND,
                record.key()
            ))),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<T> {
        log::trace!("Table<{}>::remove( {:?} )", T::KIND, key);
        self.rows.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.rows.contains_key(key)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub fn find<P>(&self, pred: P) -> Option<&T>
    where
        P: Fn(&T) -> bool,
    {
        self.rows.values().find(|r| pred(r))
    }

    pub fn find_mut<P>(&mut self, pred: P) -> Option<&mut T>
    where
        P: Fn(&T) -> bool,
    {
        self.rows.values_mut().find(|r| pred(r))
    }

    /// Clones of every record matching `pred`.
    pub fn filter<P>(&self, pred: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.rows.values().filter(|r| pred(r)).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear()
    }
}

/// The whole data set. Callers own it and pass it to every operation.
#[derive(Debug, Clone, Default)]
pub struct Store {
    pub users: Table<User>,
    pub courses: Table<Course>,
    pub enrollments: Table<Enrollment>,
    pub grades: Table<Grade>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        log::debug!("Store::clear() called.");
        self.users.clear();
        self.courses.clear();
        self.enrollments.clear();
        self.grades.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EnrollmentStatus;

    fn course(id: &str) -> Course {
        Course {
            course_id: id.to_owned(),
            name: format!("Subject {}", id),
            coordinator_id: "prof_a".to_owned(),
        }
    }

    #[test]
    fn insert_rejects_existing_key() {
        let mut t: Table<Course> = Table::default();
        t.insert(course("SUBJ-X")).unwrap();
        let err = t.insert(course("SUBJ-X")).unwrap_err();
        assert_eq!(err.kind(), "Duplicate");
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn fetch_and_update_report_missing_keys() {
        let mut t: Table<Course> = Table::default();
        assert_eq!(t.fetch("SUBJ-Q").unwrap_err().kind(), "NotFound");
        assert_eq!(t.update(course("SUBJ-Q")).unwrap_err().kind(), "NotFound");
    }

    #[test]
    fn update_replaces_in_place() {
        let mut t: Table<Enrollment> = Table::default();
        let e = Enrollment::pending("stud_a", "SUBJ-X");
        let id = e.enrollment_id.clone();
        t.insert(e.clone()).unwrap();

        let mut changed = e;
        changed.status = EnrollmentStatus::Enrolled;
        t.update(changed).unwrap();

        assert_eq!(t.len(), 1);
        assert_eq!(t.get(&id).unwrap().status, EnrollmentStatus::Enrolled);
    }

    #[test]
    fn values_come_out_in_key_order() {
        let mut t: Table<Course> = Table::default();
        for id in ["SUBJ-Z", "SUBJ-X", "SUBJ-Y"] {
            t.insert(course(id)).unwrap();
        }
        let ids: Vec<&str> = t.values().map(|c| c.course_id.as_str()).collect();
        assert_eq!(ids, vec!["SUBJ-X", "SUBJ-Y", "SUBJ-Z"]);
    }

    #[test]
    fn clear_empties_every_table() {
        let mut store = crate::tests::populated_store();
        store.clear();
        assert!(store.users.is_empty());
        assert!(store.courses.is_empty());
        assert!(store.enrollments.is_empty());
        assert!(store.grades.is_empty());
    }
}
