/*!
Account and catalog management.
*/
use crate::err::Error;
use crate::models::{Course, NewCourse, NewUser, Role, User};
use crate::store::Store;

/// Create a student or professor from `data`.
pub fn add_user(store: &mut Store, data: NewUser) -> Result<User, Error> {
    log::trace!("admin::add_user( {:?} ) called.", &data.user_id);

    let user_id = match data.user_id.clone() {
        Some(id) if !id.is_empty() => id,
        _ => {
            return Err(Error::invalid_payload("`user_id` is missing or empty"));
        }
    };

    if store.users.contains(&user_id) {
        return Err(Error::duplicate(format!(
            "User with id `{}` already exists!",
            user_id
        )));
    }

    let role = data.role;
    let user = match role {
        Some(Role::Admin) => {
            return Err(Error::invalid_payload("Admin accounts cannot be added."));
        }
        None => {
            return Err(Error::invalid_payload("`role` is missing"));
        }
        Some(_) => data.into_user(user_id).ok_or_else(|| {
            Error::invalid_payload("`role` must be student or professor")
        })?,
    };

    let user = store.users.insert(user)?.clone();
    log::info!("Added {} {:?}.", user.role(), user.id());
    Ok(user)
}

/// Delete a non-admin user and hand back the removed record.
pub fn remove_user(store: &mut Store, user_id: &str) -> Result<User, Error> {
    log::trace!("admin::remove_user( {:?} ) called.", user_id);

    if store.users.fetch(user_id)?.role() == Role::Admin {
        log::warn!("Refusing to remove admin {:?}.", user_id);
        return Err(Error::unauthorized(format!(
            "Admin `{}` cannot be removed.",
            user_id
        )));
    }

    let removed = store
        .users
        .remove(user_id)
        .ok_or_else(|| Error::not_found(format!("User with id `{}` does not exist!", user_id)))?;
    log::info!("Removed {} {:?}.", removed.role(), user_id);
    Ok(removed)
}

pub fn add_course(store: &mut Store, data: NewCourse) -> Result<Course, Error> {
    log::trace!("admin::add_course( {:?} ) called.", &data);

    let course_id = match data.course_id {
        Some(id) if !id.is_empty() => id,
        _ => {
            return Err(Error::invalid_payload("`course_id` is missing or empty"));
        }
    };

    if store.courses.contains(&course_id) {
        return Err(Error::duplicate(format!(
            "Course with id `{}` already exists!",
            course_id
        )));
    }

    let coordinator = store.users.fetch(&data.coordinator_id)?;
    if coordinator.role() != Role::Professor {
        return Err(Error::invalid_payload(format!(
            "Coordinator `{}` is a {}, not a Professor.",
            coordinator.id(),
            coordinator.role()
        )));
    }

    let course = Course {
        course_id,
        name: data.name,
        coordinator_id: data.coordinator_id,
    };
    let course = store.courses.insert(course)?.clone();
    log::info!(
        "Added course {:?} coordinated by {:?}.",
        &course.course_id,
        &course.coordinator_id
    );
    Ok(course)
}

/**
Delete a course.

Enrollments and grades that point at it are left where they are; they
simply stop resolving.
*/
pub fn remove_course(store: &mut Store, course_id: &str) -> Result<Course, Error> {
    log::trace!("admin::remove_course( {:?} ) called.", course_id);

    let removed = store.courses.remove(course_id).ok_or_else(|| {
        Error::not_found(format!("Course with id `{}` does not exist!", course_id))
    })?;

    let orphans = store
        .enrollments
        .values()
        .filter(|e| e.course_id == course_id)
        .count()
        + store
            .grades
            .values()
            .filter(|g| g.course_id == course_id)
            .count();
    if orphans > 0 {
        log::warn!(
            "Course {:?} removed; {} enrollment/grade record(s) still reference it.",
            course_id,
            orphans
        );
    }

    log::info!("Removed course {:?}.", course_id);
    Ok(removed)
}

/// Every user, or just those with `role`.
pub fn list_users(store: &Store, role: Option<Role>) -> Vec<User> {
    log::trace!("admin::list_users( {:?} ) called.", &role);
    store
        .users
        .filter(|u| role.map_or(true, |r| u.role() == r))
}
