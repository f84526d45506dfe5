/*!
What a course coordinator can do: review and approve registrations, record
grades, and list the students enrolled in their courses.

Every operation that touches a course checks the caller is its coordinator.
*/
use crate::err::Error;
use crate::models::{Course, Enrollment, EnrollmentStatus, Grade, User};
use crate::store::Store;

/// Fetch `course_id`, insisting `professor_id` coordinates it.
fn coordinated_course<'a>(
    store: &'a Store,
    professor_id: &str,
    course_id: &str,
) -> Result<&'a Course, Error> {
    let course = store.courses.fetch(course_id)?;
    if course.coordinator_id != professor_id {
        log::warn!(
            "{:?} tried to act on {:?}, which is coordinated by {:?}.",
            professor_id,
            course_id,
            &course.coordinator_id
        );
        return Err(Error::unauthorized(format!(
            "`{}` is not the coordinator of `{}`.",
            professor_id, course_id
        )));
    }
    Ok(course)
}

pub fn view_pending_registrations(store: &Store, professor_id: &str) -> Vec<Enrollment> {
    log::trace!(
        "professor::view_pending_registrations( {:?} ) called.",
        professor_id
    );

    let courses: Vec<&str> = store
        .courses
        .values()
        .filter(|c| c.coordinator_id == professor_id)
        .map(|c| c.course_id.as_str())
        .collect();

    store.enrollments.filter(|e| {
        e.status == EnrollmentStatus::Pending && courses.contains(&e.course_id.as_str())
    })
}

/// Move a Pending enrollment, looked up by id, to Enrolled.
pub fn approve_registration(
    store: &mut Store,
    professor_id: &str,
    enrollment_id: &str,
) -> Result<Enrollment, Error> {
    log::trace!(
        "professor::approve_registration( {:?}, {:?} ) called.",
        professor_id,
        enrollment_id
    );

    let course_id = store.enrollments.fetch(enrollment_id)?.course_id.clone();
    coordinated_course(store, professor_id, &course_id)?;

    let enrollment = store.enrollments.get_mut(enrollment_id).ok_or_else(|| {
        Error::not_found(format!(
            "Enrollment with id `{}` does not exist!",
            enrollment_id
        ))
    })?;
    enroll(enrollment)
}

/// Same as `approve_registration()`, with the enrollment named by its pair.
pub fn approve_registration_for(
    store: &mut Store,
    professor_id: &str,
    student_id: &str,
    course_id: &str,
) -> Result<Enrollment, Error> {
    log::trace!(
        "professor::approve_registration_for( {:?}, {:?}, {:?} ) called.",
        professor_id,
        student_id,
        course_id
    );

    coordinated_course(store, professor_id, course_id)?;

    let enrollment = store
        .enrollments
        .find_mut(|e| e.is_for(student_id, course_id))
        .ok_or_else(|| {
            Error::not_found(format!(
                "No registration of `{}` for `{}` found.",
                student_id, course_id
            ))
        })?;
    enroll(enrollment)
}

fn enroll(enrollment: &mut Enrollment) -> Result<Enrollment, Error> {
    if enrollment.status != EnrollmentStatus::Pending {
        return Err(Error::invalid_state(format!(
            "Enrollment `{}` is {:?}, not Pending.",
            &enrollment.enrollment_id, enrollment.status
        )));
    }

    enrollment.status = EnrollmentStatus::Enrolled;
    log::info!(
        "Approval: {:?} is now Enrolled in {:?}.",
        &enrollment.student_id,
        &enrollment.course_id
    );
    Ok(enrollment.clone())
}

/**
Record `value` as the grade of `student_id` in `course_id`.

The student has to be Enrolled (not merely Pending). A pair that already has
a grade gets it overwritten; the grade keeps its id.
*/
pub fn upload_grade(
    store: &mut Store,
    professor_id: &str,
    student_id: &str,
    course_id: &str,
    value: &str,
) -> Result<Grade, Error> {
    log::trace!(
        "professor::upload_grade( {:?}, {:?}, {:?}, {:?} ) called.",
        professor_id,
        student_id,
        course_id,
        value
    );

    coordinated_course(store, professor_id, course_id)?;

    let enrolled = store.enrollments.find(|e| {
        e.is_for(student_id, course_id) && e.status == EnrollmentStatus::Enrolled
    });
    if enrolled.is_none() {
        return Err(Error::invalid_state(format!(
            "Cannot grade: `{}` is not enrolled in `{}`.",
            student_id, course_id
        )));
    }

    if let Some(grade) = store
        .grades
        .find_mut(|g| g.student_id == student_id && g.course_id == course_id)
    {
        log::info!(
            "Grade {:?} -> {:?} for {:?} in {:?}.",
            &grade.grade_value,
            value,
            student_id,
            course_id
        );
        grade.grade_value = value.to_owned();
        return Ok(grade.clone());
    }

    let grade = store
        .grades
        .insert(Grade::new(student_id, course_id, value))?
        .clone();
    log::info!("Grade uploaded: {:?} -> {:?} in {:?}.", student_id, value, course_id);
    Ok(grade)
}

/// Users Enrolled in `course_id`. Students removed since are skipped.
pub fn view_enrolled_students(
    store: &Store,
    professor_id: &str,
    course_id: &str,
) -> Result<Vec<User>, Error> {
    log::trace!(
        "professor::view_enrolled_students( {:?}, {:?} ) called.",
        professor_id,
        course_id
    );

    coordinated_course(store, professor_id, course_id)?;

    let students = store
        .enrollments
        .values()
        .filter(|e| e.course_id == course_id && e.status == EnrollmentStatus::Enrolled)
        .filter_map(|e| store.users.get(&e.student_id))
        .cloned()
        .collect();
    Ok(students)
}
