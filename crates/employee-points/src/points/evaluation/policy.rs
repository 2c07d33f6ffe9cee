use super::super::domain::Employee;
use super::super::tally::EmployeeTally;
use super::tie_break::TieBreaker;

/// Winner chosen from a set of standings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinnerSelection {
    pub winner: Employee,
    pub top_count: usize,
    /// Number of employees that shared `top_count`.
    pub tied: usize,
}

/// Order tallies by count, highest first. The sort is stable, so employees with
/// equal counts keep their store order.
pub(crate) fn standings(mut tallies: Vec<EmployeeTally>) -> Vec<EmployeeTally> {
    tallies.sort_by(|a, b| b.count.cmp(&a.count));
    tallies
}

/// Pick the winner from standings already sorted by [`standings`].
///
/// Returns `None` when there is nobody to choose from.
pub(crate) fn select_winner<T>(standings: &[EmployeeTally], tie_breaker: &T) -> Option<WinnerSelection>
where
    T: TieBreaker + ?Sized,
{
    let top_count = standings.first()?.count;
    let tied = standings
        .iter()
        .take_while(|tally| tally.count == top_count)
        .count();

    let index = if tied == 1 {
        0
    } else {
        let pick = tie_breaker.pick(tied);
        debug_assert!(pick < tied, "tie breaker picked {pick} of {tied} candidates");
        pick.min(tied - 1)
    };

    Some(WinnerSelection {
        winner: standings[index].employee.clone(),
        top_count,
        tied,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::points::domain::EmployeeId;

    struct FixedPick(usize);

    impl TieBreaker for FixedPick {
        fn pick(&self, _candidates: usize) -> usize {
            self.0
        }
    }

    fn tally(name: &str, count: usize) -> EmployeeTally {
        EmployeeTally {
            employee: Employee {
                id: EmployeeId(format!("emp-{name}")),
                name: name.to_string(),
                active: true,
            },
            count,
        }
    }

    fn names(standings: &[EmployeeTally]) -> Vec<&str> {
        standings.iter().map(|t| t.employee.name.as_str()).collect()
    }

    #[test]
    fn standings_sort_descending_and_keep_tie_order() {
        let sorted = standings(vec![
            tally("Ann", 1),
            tally("Ben", 4),
            tally("Cid", 2),
            tally("Dee", 4),
            tally("Eve", 2),
        ]);
        assert_eq!(names(&sorted), ["Ben", "Dee", "Cid", "Eve", "Ann"]);
    }

    #[test]
    fn single_leader_ignores_tie_breaker() {
        let sorted = standings(vec![tally("Ann", 3), tally("Ben", 5)]);
        let selection = select_winner(&sorted, &FixedPick(1)).expect("has employees");
        assert_eq!(selection.winner.name, "Ben");
        assert_eq!(selection.top_count, 5);
        assert_eq!(selection.tied, 1);
    }

    #[test]
    fn tie_breaker_indexes_into_leading_run() {
        let sorted = standings(vec![
            tally("Ann", 2),
            tally("Ben", 7),
            tally("Cid", 7),
            tally("Dee", 7),
        ]);
        let selection = select_winner(&sorted, &FixedPick(2)).expect("has employees");
        assert_eq!(selection.tied, 3);
        assert_eq!(selection.winner.name, "Dee");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "tie breaker picked 9 of 2 candidates")]
    fn out_of_range_pick_is_rejected_in_debug_builds() {
        let sorted = standings(vec![tally("Ann", 1), tally("Ben", 1), tally("Cid", 0)]);
        let _ = select_winner(&sorted, &FixedPick(9));
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn out_of_range_pick_never_leaves_tied_run() {
        let sorted = standings(vec![tally("Ann", 1), tally("Ben", 1), tally("Cid", 0)]);
        let selection = select_winner(&sorted, &FixedPick(9)).expect("has employees");
        assert_ne!(selection.winner.name, "Cid");
    }

    #[test]
    fn all_zero_counts_tie_everyone() {
        let sorted = standings(vec![tally("Ann", 0), tally("Ben", 0)]);
        let selection = select_winner(&sorted, &FixedPick(0)).expect("has employees");
        assert_eq!(selection.tied, 2);
        assert_eq!(selection.top_count, 0);
        assert_eq!(selection.winner.name, "Ann");
    }

    #[test]
    fn empty_standings_have_no_winner() {
        assert!(select_winner(&[], &FixedPick(0)).is_none());
    }
}
