// Static exercise catalog - process-wide configuration
//
// The catalog is a fixed constant table built at compile time. Both the
// aggregator (to score a run) and the validator (to check a persisted
// report against the expected weights) read from here, so the two entry
// points can never disagree about ids, weights, or ordering.

/// One exercise of the graded assignment.
#[derive(Debug, Clone, Copy)]
pub struct ExerciseSpec {
    pub id: u32,
    pub name: &'static str,
    pub points_possible: u32,
    /// Substring matched against a result set's identifier (the test file
    /// path) to locate this exercise's outcomes.
    pub result_selector: &'static str,
}

/// Points needed for a passing grade, out of [`TOTAL_POINTS`].
pub const PASS_THRESHOLD: u32 = 60;

/// Sum of all exercise weights.
pub const TOTAL_POINTS: u32 = 100;

/// The graded exercises, in report order. Weights sum to [`TOTAL_POINTS`].
pub const EXERCISES: [ExerciseSpec; 7] = [
    ExerciseSpec {
        id: 1,
        name: "git-init",
        points_possible: 15,
        result_selector: "1-git-init.test.js",
    },
    ExerciseSpec {
        id: 2,
        name: "first-commit",
        points_possible: 15,
        result_selector: "2-first-commit.test.js",
    },
    ExerciseSpec {
        id: 3,
        name: "amend-commits",
        points_possible: 15,
        result_selector: "3-amend-commits.test.js",
    },
    ExerciseSpec {
        id: 4,
        name: "branches",
        points_possible: 15,
        result_selector: "4-branches.test.js",
    },
    ExerciseSpec {
        id: 5,
        name: "github-push",
        points_possible: 15,
        result_selector: "5-github-push.test.js",
    },
    ExerciseSpec {
        id: 6,
        name: "pull-clone",
        points_possible: 10,
        result_selector: "6-pull-clone.test.js",
    },
    ExerciseSpec {
        id: 7,
        name: "merge-conflicts",
        points_possible: 15,
        result_selector: "7-merge-conflicts.test.js",
    },
];

/// Expected weight for an exercise id, `None` for ids outside the catalog.
pub fn points_for(id: u32) -> Option<u32> {
    EXERCISES
        .iter()
        .find(|spec| spec.id == id)
        .map(|spec| spec.points_possible)
}
