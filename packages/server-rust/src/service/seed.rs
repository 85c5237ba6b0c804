//! Demo data for local development.

use std::collections::BTreeSet;

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::info;

use crate::storage::{Session, StoreError};

const GROUP_COUNT: usize = 10;
const STUDENT_COUNT: usize = 200;
const MAX_COURSES_PER_STUDENT: usize = 3;

const COURSE_NAMES: [&str; 10] = [
    "Mathematics",
    "Biology",
    "Chemistry",
    "Physics",
    "History",
    "Geography",
    "Literature",
    "Art",
    "Computer Science",
    "Philosophy",
];

const FIRST_NAMES: [&str; 20] = [
    "Ada", "Alan", "Barbara", "Claude", "Dennis", "Donald", "Edsger", "Frances", "Grace",
    "Hedy", "John", "Ken", "Leslie", "Margaret", "Niklaus", "Radia", "Robin", "Shafi",
    "Tim", "Whitfield",
];

const LAST_NAMES: [&str; 20] = [
    "Lovelace", "Turing", "Liskov", "Shannon", "Ritchie", "Knuth", "Dijkstra", "Allen",
    "Hopper", "Lamarr", "McCarthy", "Thompson", "Lamport", "Hamilton", "Wirth", "Perlman",
    "Milner", "Goldwasser", "Berners-Lee", "Diffie",
];

/// Row counts written by [`seed_demo_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub groups: usize,
    pub courses: usize,
    pub students: usize,
    pub enrollments: usize,
}

/// Group names look like `AB-12`: two capital letters, a dash, two digits.
fn group_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let letter = |rng: &mut R| char::from(rng.random_range(b'A'..=b'Z'));
    let digit = |rng: &mut R| char::from(rng.random_range(b'0'..=b'9'));
    [letter(rng), letter(rng), '-', digit(rng), digit(rng)]
        .iter()
        .collect()
}

/// Writes 10 groups, 10 courses, and 200 students into `session`.
///
/// Roughly one student in eleven is left without a group; every student is
/// enrolled in one to three distinct courses. Nothing is committed here.
///
/// # Errors
///
/// Returns [`StoreError::Constraint`] if a generated group name or a course
/// name already exists in the database.
pub async fn seed_demo_data<R: Rng + Send + ?Sized>(
    session: &mut Session,
    rng: &mut R,
) -> Result<SeedReport, StoreError> {
    let mut names = BTreeSet::new();
    while names.len() < GROUP_COUNT {
        names.insert(group_name(rng));
    }
    let mut groups = Vec::with_capacity(GROUP_COUNT);
    for name in &names {
        groups.push(session.insert_group(name).await?);
    }
    info!(count = groups.len(), "groups created");

    let mut courses = Vec::with_capacity(COURSE_NAMES.len());
    for name in COURSE_NAMES {
        let description = format!("An introductory course in {name}.");
        courses.push(session.insert_course(name, Some(&description)).await?);
    }
    info!(count = courses.len(), "courses created");

    let mut enrollments = 0;
    for _ in 0..STUDENT_COUNT {
        let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Ada");
        let last = LAST_NAMES.choose(rng).copied().unwrap_or("Lovelace");
        // One extra slot stands for "no group".
        let slot = rng.random_range(0..=groups.len());
        let group_id = groups.get(slot).map(|g| g.id);
        let student = session.insert_student(first, last, group_id).await?;

        let take = rng.random_range(1..=MAX_COURSES_PER_STUDENT);
        let picked: Vec<_> = courses.choose_multiple(rng, take).map(|c| c.id).collect();
        for course_id in picked {
            session.enroll(student.id, course_id).await?;
            enrollments += 1;
        }
    }
    info!(students = STUDENT_COUNT, enrollments, "students created and enrolled");

    Ok(SeedReport {
        groups: groups.len(),
        courses: courses.len(),
        students: STUDENT_COUNT,
        enrollments,
    })
}
