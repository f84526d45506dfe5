/*!
What a student can do: browse the catalog, ask to join a course, and read
back their own registrations and grades.
*/
use crate::auth::require_role;
use crate::err::Error;
use crate::models::{Course, Enrollment, Grade, Role};
use crate::store::Store;

pub fn view_courses(store: &Store) -> Vec<Course> {
    log::trace!("student::view_courses() called.");
    store.courses.values().cloned().collect()
}

/**
File a Pending enrollment of `student_id` in `course_id`.

Any existing enrollment for the pair, whatever its status, blocks a new one.
*/
pub fn register_course(
    store: &mut Store,
    student_id: &str,
    course_id: &str,
) -> Result<Enrollment, Error> {
    log::trace!(
        "student::register_course( {:?}, {:?} ) called.",
        student_id,
        course_id
    );

    require_role(store, student_id, Role::Student)?;
    store.courses.fetch(course_id)?;

    if let Some(existing) = store.enrollments.find(|e| e.is_for(student_id, course_id)) {
        return Err(Error::duplicate(format!(
            "`{}` already has a {:?} registration for `{}`.",
            student_id, existing.status, course_id
        )));
    }

    let enrollment = store
        .enrollments
        .insert(Enrollment::pending(student_id, course_id))?
        .clone();
    log::info!(
        "Registration request {}: {:?} for {:?} is Pending.",
        &enrollment.enrollment_id,
        student_id,
        course_id
    );
    Ok(enrollment)
}

pub fn view_grades(store: &Store, student_id: &str) -> Vec<Grade> {
    log::trace!("student::view_grades( {:?} ) called.", student_id);
    store.grades.filter(|g| g.student_id == student_id)
}

/// Every enrollment of `student_id`, whatever its status.
pub fn view_registered_courses(store: &Store, student_id: &str) -> Vec<Enrollment> {
    log::trace!("student::view_registered_courses( {:?} ) called.", student_id);
    store.enrollments.filter(|e| e.student_id == student_id)
}
