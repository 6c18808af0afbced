// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The 3-7-15 review schedule.

use crate::types::date::Date;
use crate::types::problem::CompletedDates;
use crate::types::problem::Problem;

/// Days after a problem is added on which it should be reviewed.
pub const REVIEW_OFFSETS: [u64; 3] = [3, 7, 15];

/// The status of a single scheduled review.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ReviewStatus {
    /// The review was done.
    Completed,
    /// The review is scheduled for today and has not been done.
    Due,
    /// The review date has passed without the review being done.
    Overdue,
    /// The review date is in the future.
    Upcoming,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Completed => "completed",
            ReviewStatus::Due => "due",
            ReviewStatus::Overdue => "overdue",
            ReviewStatus::Upcoming => "upcoming",
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            ReviewStatus::Completed => "✓",
            ReviewStatus::Due => "⏰",
            ReviewStatus::Overdue => "❌",
            ReviewStatus::Upcoming => "",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ScheduledReview {
    pub date: Date,
    pub status: ReviewStatus,
}

/// The review dates for a problem added on `date_added`, in order.
pub fn schedule_dates(date_added: Date) -> [Date; 3] {
    REVIEW_OFFSETS.map(|days| date_added.add_days(days))
}

/// Classify one review date. Completion takes precedence over everything
/// else, so each date falls into exactly one status.
pub fn classify(date: Date, completed: &CompletedDates, today: Date) -> ReviewStatus {
    if completed.contains(&date) {
        ReviewStatus::Completed
    } else if date == today {
        ReviewStatus::Due
    } else if date < today {
        ReviewStatus::Overdue
    } else {
        ReviewStatus::Upcoming
    }
}

/// True if one of the problem's review dates is today and it hasn't been done.
pub fn is_due_today(problem: &Problem, today: Date) -> bool {
    schedule_dates(problem.date_added)
        .iter()
        .any(|date| *date == today && !problem.completed_dates.contains(date))
}

/// Every review date of the problem, paired with its status.
pub fn schedule(problem: &Problem, today: Date) -> [ScheduledReview; 3] {
    schedule_dates(problem.date_added).map(|date| ScheduledReview {
        date,
        status: classify(date, &problem.completed_dates, today),
    })
}

/// Days elapsed since the problem was added. Negative if the add-date is in
/// the future.
pub fn review_day(problem: &Problem, today: Date) -> i64 {
    today.days_since(problem.date_added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::difficulty::Difficulty;
    use crate::types::problem::NewProblem;
    use crate::types::problem::ProblemId;
    use crate::types::timestamp::Timestamp;

    fn date(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    fn problem(added: &str, completed: &[&str]) -> Problem {
        let mut problem = NewProblem::new("Two Sum", None, Difficulty::Easy, "Arrays", "LeetCode")
            .unwrap()
            .into_problem(ProblemId::new("1"), date(added), Timestamp::now());
        for d in completed {
            problem.complete(date(d), Timestamp::now());
        }
        problem
    }

    #[test]
    fn test_schedule_dates() {
        assert_eq!(
            schedule_dates(date("2024-01-01")),
            [date("2024-01-04"), date("2024-01-08"), date("2024-01-16")]
        );
    }

    #[test]
    fn test_schedule_dates_across_month_end() {
        assert_eq!(
            schedule_dates(date("2024-02-27")),
            [date("2024-03-01"), date("2024-03-05"), date("2024-03-13")]
        );
    }

    #[test]
    fn test_schedule_dates_across_year_end() {
        assert_eq!(
            schedule_dates(date("2024-12-25")),
            [date("2024-12-28"), date("2025-01-01"), date("2025-01-09")]
        );
    }

    #[test]
    fn test_due_on_first_review() {
        let p = problem("2024-01-01", &[]);
        assert!(is_due_today(&p, date("2024-01-04")));
    }

    #[test]
    fn test_due_on_every_review_date() {
        let p = problem("2024-01-01", &[]);
        for d in schedule_dates(p.date_added) {
            assert!(is_due_today(&p, d));
        }
    }

    #[test]
    fn test_not_due_between_reviews() {
        let p = problem("2024-01-01", &[]);
        assert!(!is_due_today(&p, date("2024-01-01")));
        assert!(!is_due_today(&p, date("2024-01-05")));
        assert!(!is_due_today(&p, date("2024-01-17")));
    }

    #[test]
    fn test_completing_clears_due() {
        let mut p = problem("2024-01-01", &[]);
        let today = date("2024-01-08");
        assert!(is_due_today(&p, today));
        p.complete(today, Timestamp::now());
        assert!(!is_due_today(&p, today));
        p.complete(today, Timestamp::now());
        assert!(!is_due_today(&p, today));
    }

    #[test]
    fn test_future_add_date_is_never_due_early() {
        let p = problem("2024-06-01", &[]);
        assert!(!is_due_today(&p, date("2024-01-04")));
        assert_eq!(review_day(&p, date("2024-05-31")), -1);
    }

    #[test]
    fn test_classify_precedence() {
        let completed: CompletedDates = [date("2024-01-04")].into_iter().collect();
        let today = date("2024-01-08");
        assert_eq!(classify(date("2024-01-04"), &completed, today), ReviewStatus::Completed);
        assert_eq!(classify(date("2024-01-08"), &completed, today), ReviewStatus::Due);
        assert_eq!(classify(date("2024-01-05"), &completed, today), ReviewStatus::Overdue);
        assert_eq!(classify(date("2024-01-16"), &completed, today), ReviewStatus::Upcoming);
    }

    #[test]
    fn test_completed_wins_over_due() {
        let completed: CompletedDates = [date("2024-01-08")].into_iter().collect();
        let today = date("2024-01-08");
        assert_eq!(classify(today, &completed, today), ReviewStatus::Completed);
    }

    #[test]
    fn test_schedule_statuses() {
        let p = problem("2024-01-01", &["2024-01-04"]);
        let statuses: Vec<ReviewStatus> = schedule(&p, date("2024-01-10"))
            .iter()
            .map(|r| r.status)
            .collect();
        assert_eq!(
            statuses,
            vec![ReviewStatus::Completed, ReviewStatus::Overdue, ReviewStatus::Upcoming]
        );
    }

    #[test]
    fn test_review_day() {
        let p = problem("2024-01-01", &[]);
        assert_eq!(review_day(&p, date("2024-01-08")), 7);
    }
}
