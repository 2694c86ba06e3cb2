use crate::domain::model::{Assignment, AssignmentReport, UpcomingView};
use chrono::{DateTime, Duration, Utc};

fn window(window_days: u32) -> Duration {
    Duration::days(i64::from(window_days))
}

/// Past due, but by no more than `window_days`.
pub fn is_overdue(assignment: &Assignment, now: DateTime<Utc>, window_days: u32) -> bool {
    match assignment.due_at {
        Some(due) => due < now && now - due <= window(window_days),
        None => false,
    }
}

/// 是否應出現在報表中（逾期太久或依 view 沒有截止日的作業會被略過）
pub fn is_relevant(
    assignment: &Assignment,
    now: DateTime<Utc>,
    window_days: u32,
    view: UpcomingView,
) -> bool {
    match assignment.due_at {
        Some(due) if due < now => now - due <= window(window_days),
        Some(_) => true,
        None => view == UpcomingView::IncludeUndated,
    }
}

/// Splits assignments into overdue and upcoming buckets.
///
/// Overdue is sorted by due date ascending. Upcoming is sorted by due date
/// with dateless assignments (only present in [`UpcomingView::IncludeUndated`]) last.
pub fn classify(
    assignments: Vec<Assignment>,
    now: DateTime<Utc>,
    window_days: u32,
    view: UpcomingView,
) -> AssignmentReport {
    let (mut overdue, mut upcoming): (Vec<_>, Vec<_>) = assignments
        .into_iter()
        .filter(|a| is_relevant(a, now, window_days, view))
        .partition(|a| is_overdue(a, now, window_days));

    overdue.sort_by_key(|a| a.due_at);
    upcoming.sort_by_key(|a| (a.due_at.is_none(), a.due_at));

    tracing::debug!(
        "🗂️ Classified {} overdue and {} upcoming (window {} days, {:?})",
        overdue.len(),
        upcoming.len(),
        window_days,
        view
    );

    AssignmentReport {
        generated_at: now,
        window_days,
        view,
        overdue,
        upcoming,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(id: i64, due_at: Option<DateTime<Utc>>) -> Assignment {
        Assignment {
            id,
            title: format!("Assignment {}", id),
            course_name: "Course".to_string(),
            url: None,
            points: Some(10.0),
            published: true,
            due_at,
            submission: None,
        }
    }

    fn ids(assignments: &[Assignment]) -> Vec<i64> {
        assignments.iter().map(|a| a.id).collect()
    }

    #[test]
    fn test_windowed_view() {
        let now = Utc::now();
        let items = vec![
            assignment(1, Some(now - Duration::days(3))),
            assignment(2, Some(now - Duration::days(10))),
            assignment(3, Some(now + Duration::days(1))),
            assignment(4, None),
        ];

        let report = classify(items, now, 7, UpcomingView::DatedOnly);

        assert_eq!(ids(&report.overdue), vec![1]);
        assert_eq!(ids(&report.upcoming), vec![3]);
        assert_eq!(report.window_days, 7);
        assert_eq!(report.generated_at, now);
    }

    #[test]
    fn test_include_undated_view_keeps_dateless_upcoming() {
        let now = Utc::now();
        let items = vec![
            assignment(1, Some(now - Duration::days(3))),
            assignment(2, Some(now - Duration::days(10))),
            assignment(3, Some(now + Duration::days(1))),
            assignment(4, None),
        ];

        let report = classify(items, now, 7, UpcomingView::IncludeUndated);

        assert_eq!(ids(&report.overdue), vec![1]);
        assert_eq!(ids(&report.upcoming), vec![3, 4]);
    }

    #[test]
    fn test_dateless_is_never_overdue() {
        let now = Utc::now();
        assert!(!is_overdue(&assignment(1, None), now, 365));
    }

    #[test]
    fn test_window_boundaries() {
        let now = Utc::now();
        let exactly_at_edge = assignment(1, Some(now - Duration::days(7)));
        let just_past_edge = assignment(2, Some(now - Duration::days(7) - Duration::seconds(1)));
        let due_now = assignment(3, Some(now));

        assert!(is_overdue(&exactly_at_edge, now, 7));
        assert!(!is_relevant(&just_past_edge, now, 7, UpcomingView::IncludeUndated));
        // 截止時間等於 now 不算逾期
        assert!(!is_overdue(&due_now, now, 7));
        assert!(is_relevant(&due_now, now, 7, UpcomingView::DatedOnly));
    }

    #[test]
    fn test_zero_window_drops_everything_past_due() {
        let now = Utc::now();
        let items = vec![
            assignment(1, Some(now - Duration::minutes(1))),
            assignment(2, Some(now + Duration::minutes(1))),
        ];

        let report = classify(items, now, 0, UpcomingView::DatedOnly);
        assert!(report.overdue.is_empty());
        assert_eq!(ids(&report.upcoming), vec![2]);
    }

    #[test]
    fn test_sort_orders() {
        let now = Utc::now();
        let overdue = vec![
            assignment(1, Some(now - Duration::days(1))),
            assignment(5, Some(now - Duration::days(5))),
            assignment(2, Some(now - Duration::days(2))),
        ];
        let report = classify(overdue, now, 7, UpcomingView::DatedOnly);
        assert_eq!(ids(&report.overdue), vec![5, 2, 1]);

        let upcoming = vec![
            assignment(0, None),
            assignment(1, Some(now + Duration::days(1))),
            assignment(5, Some(now + Duration::days(5))),
        ];
        let report = classify(upcoming, now, 7, UpcomingView::IncludeUndated);
        assert_eq!(ids(&report.upcoming), vec![1, 5, 0]);
    }

    #[test]
    fn test_empty_input() {
        let report = classify(Vec::new(), Utc::now(), 7, UpcomingView::DatedOnly);
        assert!(report.overdue.is_empty());
        assert!(report.upcoming.is_empty());
    }
}
