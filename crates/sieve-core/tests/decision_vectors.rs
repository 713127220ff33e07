//! Decision vector tests: table-driven include/exclude scenarios.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]


fn run(file: &str) {
    for v in vector_loader::load(file) {
        let policy = v.build();
        for c in &v.cases {
            assert_eq!(
                policy.is_included(&c.candidate),
                c.allowed,
                "{}: candidate {}",
                v.description,
                c.candidate
            );
        }
    }
}

#[test]
fn exact_vectors() {
    run("exact.json");
}

#[test]
fn pattern_vectors() {
    run("pattern.json");
}
