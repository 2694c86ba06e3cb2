use crate::domain::model::{Assignment, AssignmentReport, Course, TermSummary};
use crate::domain::ports::Presenter;
use crate::utils::error::Result;
use chrono::{DateTime, Duration, Local, Utc};
use std::io::Write;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

mod ansi {
    pub const RED: &str = "\x1b[91m";
    pub const YELLOW: &str = "\x1b[93m";
    pub const GREEN: &str = "\x1b[92m";
    pub const GREY: &str = "\x1b[90m";
    pub const BLUE: &str = "\x1b[94m";
    pub const ORANGE: &str = "\x1b[38;5;208m";
    pub const RESET: &str = "\x1b[0m";
}

const COLUMN_GAP: &str = "  ";
const ELLIPSIS: char = '…';
const NO_VALUE: &str = "—";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenterConfig {
    pub color: bool,
    /// 標題欄位最大寬度（字元數），超過以 … 截斷
    pub title_width: usize,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            color: true,
            title_width: 48,
        }
    }
}

#[derive(Debug, Clone)]
struct Cell {
    text: String,
    color: Option<&'static str>,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }

    fn colored(text: impl Into<String>, color: &'static str) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
        }
    }
}

/// Cuts `text` to `width` terminal columns, ending with `…` when shortened.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let budget = width - 1;
    let mut used = 0;
    let mut cut = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        cut.push(ch);
    }
    cut.push(ELLIPSIS);
    cut
}

/// 以終端機欄寬補空白（全形字佔兩欄）
fn pad_to(text: &str, width: usize) -> String {
    let mut padded = text.to_string();
    padded.push_str(&" ".repeat(width.saturating_sub(text.width())));
    padded
}

/// "2d 3h late", "2d late", "5h late" or "12m late"; empty when not late.
pub fn human_lateness(now: DateTime<Utc>, due: DateTime<Utc>) -> String {
    if now < due {
        return String::new();
    }
    let late = (now - due).num_seconds();
    let days = late / 86_400;
    let hours = (late % 86_400) / 3_600;

    if days > 0 {
        return if hours > 0 {
            format!("{}d {}h late", days, hours)
        } else {
            format!("{}d late", days)
        };
    }
    if hours > 0 {
        return format!("{}h late", hours);
    }
    format!("{}m late", (late % 3_600) / 60)
}

fn due_color(due: DateTime<Utc>, now: DateTime<Utc>) -> &'static str {
    let delta = due - now;
    if delta <= Duration::days(2) {
        ansi::RED
    } else if delta <= Duration::days(7) {
        ansi::YELLOW
    } else {
        ansi::GREEN
    }
}

fn format_points(points: Option<f64>) -> String {
    match points {
        Some(p) if p.fract() == 0.0 => format!("{:.0}", p),
        Some(p) => format!("{}", p),
        None => "N/A".to_string(),
    }
}

fn format_date(value: Option<DateTime<Utc>>, pattern: &str) -> String {
    value
        .map(|dt| dt.with_timezone(&Local).format(pattern).to_string())
        .unwrap_or_else(|| NO_VALUE.to_string())
}

pub struct ConsolePresenter<W: Write> {
    out: W,
    config: PresenterConfig,
}

impl ConsolePresenter<std::io::Stdout> {
    pub fn stdout(config: PresenterConfig) -> Self {
        Self::new(std::io::stdout(), config)
    }
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(out: W, config: PresenterConfig) -> Self {
        Self { out, config }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, color: &'static str) -> String {
        if self.config.color {
            format!("{}{}{}", color, text, ansi::RESET)
        } else {
            text.to_string()
        }
    }

    fn write_placeholder(&mut self, message: &str) -> Result<()> {
        let line = self.paint(message, ansi::GREY);
        writeln!(self.out, "{}", line)?;
        Ok(())
    }

    /// 依純文字顯示寬度對齊，再套上顏色，避免 ANSI 碼影響欄寬
    fn write_table(&mut self, headers: &[&str], rows: &[Vec<Cell>]) -> Result<()> {
        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                rows.iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.text.width())
                    .chain(std::iter::once(header.width()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header_cells: Vec<Cell> = headers.iter().map(|h| Cell::plain(*h)).collect();
        let header_line = self.format_row(&header_cells, &widths);
        writeln!(self.out, "{}", header_line)?;

        let rule = widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        writeln!(self.out, "{}", rule)?;

        for row in rows {
            let line = self.format_row(row, &widths);
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    fn format_row(&self, cells: &[Cell], widths: &[usize]) -> String {
        let last = cells.len().saturating_sub(1);
        let parts: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let width = widths.get(i).copied().unwrap_or(0);
                let padded = if i == last {
                    cell.text.clone()
                } else {
                    pad_to(&cell.text, width)
                };
                match cell.color {
                    Some(color) => self.paint(&padded, color),
                    None => padded,
                }
            })
            .collect();
        parts.join(COLUMN_GAP).trim_end().to_string()
    }

    fn assignment_cells(&self, assignment: &Assignment) -> Vec<Cell> {
        vec![
            Cell::colored(assignment.id.to_string(), ansi::BLUE),
            Cell::plain(truncate(&assignment.title, self.config.title_width)),
            Cell::colored(assignment.course_name.clone(), ansi::ORANGE),
        ]
    }

    fn due_cell(&self, due: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Cell {
        match due {
            Some(due) => Cell::colored(format_date(Some(due), "%Y-%m-%d %H:%M"), due_color(due, now)),
            None => Cell::colored(NO_VALUE, ansi::GREY),
        }
    }

    fn write_overdue(&mut self, report: &AssignmentReport) -> Result<()> {
        writeln!(
            self.out,
            "=== Overdue (unsubmitted: last {} days) ===",
            report.window_days
        )?;
        if report.overdue.is_empty() {
            self.write_placeholder(&format!("None in the last {} days.", report.window_days))?;
            writeln!(self.out)?;
            return Ok(());
        }

        let now = report.generated_at;
        let rows: Vec<Vec<Cell>> = report
            .overdue
            .iter()
            .map(|a| {
                let mut cells = self.assignment_cells(a);
                cells.push(self.due_cell(a.due_at, now));
                cells.push(Cell::colored(
                    a.due_at.map(|due| human_lateness(now, due)).unwrap_or_default(),
                    ansi::RED,
                ));
                cells.push(Cell::plain(format_points(a.points)));
                cells.push(Cell::plain(a.url.clone().unwrap_or_default()));
                cells
            })
            .collect();

        self.write_table(&["ID", "Title", "Course", "Due", "Late", "Points", "Link"], &rows)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn write_upcoming(&mut self, report: &AssignmentReport) -> Result<()> {
        writeln!(self.out, "=== Upcoming Assignments ===")?;
        if report.upcoming.is_empty() {
            self.write_placeholder("No upcoming assignments found.")?;
            writeln!(self.out)?;
            return Ok(());
        }

        let now = report.generated_at;
        let rows: Vec<Vec<Cell>> = report
            .upcoming
            .iter()
            .map(|a| {
                let mut cells = self.assignment_cells(a);
                cells.push(self.due_cell(a.due_at, now));
                cells.push(Cell::plain(format_points(a.points)));
                cells.push(Cell::plain(if a.published { "yes" } else { "no" }));
                cells.push(Cell::plain(a.url.clone().unwrap_or_default()));
                cells
            })
            .collect();

        self.write_table(&["ID", "Title", "Course", "Due", "Points", "Published", "Link"], &rows)?;
        writeln!(self.out)?;
        Ok(())
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn display_courses(&mut self, courses: &[Course]) -> Result<()> {
        if courses.is_empty() {
            return self.write_placeholder("No courses found.");
        }

        let rows: Vec<Vec<Cell>> = courses
            .iter()
            .map(|c| {
                vec![
                    Cell::colored(c.id.to_string(), ansi::BLUE),
                    Cell::plain(c.name.clone()),
                    Cell::plain(c.workflow_state.clone()),
                    Cell::plain(
                        c.enrollment_term_id
                            .map(|id| id.to_string())
                            .unwrap_or_else(|| NO_VALUE.to_string()),
                    ),
                ]
            })
            .collect();

        self.write_table(&["ID", "Name", "State", "Term"], &rows)?;
        self.out.flush()?;
        Ok(())
    }

    fn display_terms(&mut self, terms: &[TermSummary]) -> Result<()> {
        if terms.is_empty() {
            return self.write_placeholder("No terms found.");
        }

        let rows: Vec<Vec<Cell>> = terms
            .iter()
            .map(|summary| {
                let current = if summary.current {
                    Cell::colored("*", ansi::GREEN)
                } else {
                    Cell::plain("")
                };
                vec![
                    Cell::colored(summary.term.id.to_string(), ansi::BLUE),
                    Cell::plain(summary.term.name.clone().unwrap_or_else(|| NO_VALUE.to_string())),
                    Cell::plain(format_date(summary.term.start_at, "%Y-%m-%d")),
                    Cell::plain(format_date(summary.term.end_at, "%Y-%m-%d")),
                    Cell::plain(summary.course_count.to_string()),
                    current,
                ]
            })
            .collect();

        self.write_table(&["ID", "Name", "Start", "End", "Courses", "Current"], &rows)?;
        self.out.flush()?;
        Ok(())
    }

    fn display_assignments(&mut self, report: &AssignmentReport) -> Result<()> {
        writeln!(self.out)?;
        self.write_overdue(report)?;
        self.write_upcoming(report)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Term, UpcomingView};

    fn presenter() -> ConsolePresenter<Vec<u8>> {
        ConsolePresenter::new(
            Vec::new(),
            PresenterConfig {
                color: false,
                title_width: 12,
            },
        )
    }

    fn output(presenter: ConsolePresenter<Vec<u8>>) -> String {
        String::from_utf8(presenter.into_inner()).unwrap()
    }

    fn assignment(id: i64, title: &str, due_at: Option<DateTime<Utc>>) -> Assignment {
        Assignment {
            id,
            title: title.to_string(),
            course_name: "Algorithms".to_string(),
            url: Some(format!("https://canvas.test/courses/1/assignments/{}", id)),
            points: Some(10.0),
            published: true,
            due_at,
            submission: None,
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly ten", 11), "exactly ten");
        assert_eq!(truncate("Programming Assignment 4", 12), "Programming…");
        assert_eq!(truncate("Þjóðfræði og saga", 5), "Þjóð…");
        assert_eq!(truncate("anything", 0), "");
        assert_eq!(truncate("資料結構與演算法", 7), "資料結…");
        assert_eq!(truncate("資料結構", 8), "資料結構");
    }

    #[test]
    fn test_wide_glyphs_keep_columns_aligned() {
        let mut p = presenter();
        let courses = vec![
            Course {
                id: 1,
                name: "資料庫".to_string(),
                workflow_state: "available".to_string(),
                enrollment_term_id: Some(51),
            },
            Course {
                id: 2,
                name: "Algorithms".to_string(),
                workflow_state: "available".to_string(),
                enrollment_term_id: Some(51),
            },
        ];

        p.display_courses(&courses).unwrap();
        let text = output(p);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "ID  Name        State      Term");
        assert_eq!(lines[2], "1   資料庫      available  51");
        assert_eq!(lines[3], "2   Algorithms  available  51");
        assert_eq!(lines[2].width(), lines[3].width());
    }

    #[test]
    fn test_human_lateness() {
        let due = Utc::now();
        assert_eq!(human_lateness(due + Duration::hours(51), due), "2d 3h late");
        assert_eq!(human_lateness(due + Duration::days(2), due), "2d late");
        assert_eq!(human_lateness(due + Duration::hours(5), due), "5h late");
        assert_eq!(human_lateness(due + Duration::minutes(12), due), "12m late");
        assert_eq!(human_lateness(due - Duration::minutes(1), due), "");
    }

    #[test]
    fn test_format_points() {
        assert_eq!(format_points(Some(10.0)), "10");
        assert_eq!(format_points(Some(2.5)), "2.5");
        assert_eq!(format_points(None), "N/A");
    }

    #[test]
    fn test_courses_table_is_aligned() {
        let mut p = presenter();
        let courses = vec![
            Course {
                id: 9424,
                name: "Algorithms".to_string(),
                workflow_state: "available".to_string(),
                enrollment_term_id: Some(51),
            },
            Course {
                id: 7,
                name: "OS".to_string(),
                workflow_state: "available".to_string(),
                enrollment_term_id: None,
            },
        ];

        p.display_courses(&courses).unwrap();
        let text = output(p);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "ID    Name        State      Term");
        assert_eq!(lines[1], "----  ----------  ---------  ----");
        assert_eq!(lines[2], "9424  Algorithms  available  51");
        assert_eq!(lines[3], "7     OS          available  —");
    }

    #[test]
    fn test_empty_placeholders() {
        let mut p = presenter();
        p.display_courses(&[]).unwrap();
        p.display_terms(&[]).unwrap();
        p.display_assignments(&AssignmentReport {
            generated_at: Utc::now(),
            window_days: 7,
            view: UpcomingView::DatedOnly,
            overdue: vec![],
            upcoming: vec![],
        })
        .unwrap();

        let text = output(p);
        assert!(text.contains("No courses found."));
        assert!(text.contains("No terms found."));
        assert!(text.contains("=== Overdue (unsubmitted: last 7 days) ==="));
        assert!(text.contains("None in the last 7 days."));
        assert!(text.contains("No upcoming assignments found."));
    }

    #[test]
    fn test_assignment_tables() {
        let now = Utc::now();
        let report = AssignmentReport {
            generated_at: now,
            window_days: 7,
            view: UpcomingView::IncludeUndated,
            overdue: vec![assignment(1, "Programming Assignment 4", Some(now - Duration::hours(5)))],
            upcoming: vec![assignment(2, "Quiz", Some(now + Duration::days(3))), assignment(3, "Reading", None)],
        };

        let mut p = presenter();
        p.display_assignments(&report).unwrap();
        let text = output(p);

        assert!(text.contains("Programming…"));
        assert!(!text.contains("Programming Assignment 4"));
        assert!(text.contains("5h late"));
        assert!(text.contains("https://canvas.test/courses/1/assignments/1"));
        assert!(!text.contains('\x1b'));

        let upcoming_rows: Vec<&str> = text
            .lines()
            .skip_while(|l| !l.starts_with("=== Upcoming"))
            .skip(3)
            .filter(|l| !l.is_empty())
            .collect();
        assert_eq!(upcoming_rows.len(), 2);
        assert!(upcoming_rows[0].starts_with("2 "));
        assert!(upcoming_rows[1].starts_with("3 "));
        assert!(upcoming_rows[1].contains("—"));
    }

    #[test]
    fn test_color_codes_when_enabled() {
        let mut p = ConsolePresenter::new(Vec::new(), PresenterConfig::default());
        let terms = vec![TermSummary {
            term: Term {
                id: 51,
                name: Some("Fall".to_string()),
                start_at: None,
                end_at: None,
            },
            course_count: 3,
            current: true,
        }];
        p.display_terms(&terms).unwrap();

        let text = output(p);
        assert!(text.contains(ansi::BLUE));
        assert!(text.contains(ansi::RESET));
        assert!(text.contains("Fall"));
    }
}
