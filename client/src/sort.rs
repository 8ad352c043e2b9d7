use std::cmp::Ordering;

use cfping_common::protocol::ScanKind;

use crate::table::Row;

/// A sortable measurement column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Ping,
    Speed,
}

impl From<ScanKind> for Column {
    fn from(kind: ScanKind) -> Self {
        match kind {
            ScanKind::Ping => Column::Ping,
            ScanKind::Speed => Column::Speed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Current table order.
///
/// Selecting a column walks `unsorted → ascending → descending → unsorted`;
/// selecting a different column restarts at ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortState {
    #[default]
    Unsorted,
    Sorted {
        column: Column,
        direction: SortDirection,
    },
}

impl SortState {
    pub fn cycle(self, column: Column) -> Self {
        match self {
            SortState::Sorted {
                column: current,
                direction: SortDirection::Ascending,
            } if current == column => SortState::Sorted {
                column,
                direction: SortDirection::Descending,
            },
            SortState::Sorted {
                column: current,
                direction: SortDirection::Descending,
            } if current == column => SortState::Unsorted,
            _ => SortState::Sorted {
                column,
                direction: SortDirection::Ascending,
            },
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SortState::Sorted { .. })
    }

    pub fn column(&self) -> Option<Column> {
        match self {
            SortState::Unsorted => None,
            SortState::Sorted { column, .. } => Some(*column),
        }
    }

    pub fn direction_of(&self, col: Column) -> Option<SortDirection> {
        match self {
            SortState::Sorted { column, direction } if *column == col => Some(*direction),
            _ => None,
        }
    }

    /// Row ordering for this state. Rows missing the sorted measurement go
    /// last in both directions; ties fall back to input order.
    pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
        let by_order = order_key(a).cmp(&order_key(b));

        let primary = match self {
            SortState::Unsorted => Ordering::Equal,
            SortState::Sorted {
                column: Column::Ping,
                direction,
            } => compare_measured(a.ping, b.ping, *direction, |x, y| x.cmp(y)),
            SortState::Sorted {
                column: Column::Speed,
                direction,
            } => compare_measured(a.speed, b.speed, *direction, f64::total_cmp),
        };

        primary.then(by_order)
    }
}

fn order_key(row: &Row) -> usize {
    row.order.unwrap_or(usize::MAX)
}

fn compare_measured<T>(
    a: Option<T>,
    b: Option<T>,
    direction: SortDirection,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => match direction {
            SortDirection::Ascending => cmp(&x, &y),
            SortDirection::Descending => cmp(&y, &x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RowKey;

    fn row(host: &str, order: Option<usize>, ping: Option<i64>, speed: Option<f64>) -> Row {
        let mut row = Row::new(RowKey::new(host, 443), order);
        row.ping = ping;
        row.speed = speed;
        row
    }

    fn sorted(mut rows: Vec<Row>, state: SortState) -> Vec<String> {
        rows.sort_by(|a, b| state.compare(a, b));
        rows.into_iter().map(|r| r.key.host).collect()
    }

    #[test]
    fn cycle_walks_three_states() {
        let s = SortState::Unsorted.cycle(Column::Ping);
        assert_eq!(s.direction_of(Column::Ping), Some(SortDirection::Ascending));
        let s = s.cycle(Column::Ping);
        assert_eq!(s.direction_of(Column::Ping), Some(SortDirection::Descending));
        let s = s.cycle(Column::Ping);
        assert_eq!(s, SortState::Unsorted);
    }

    #[test]
    fn switching_column_restarts_ascending() {
        let s = SortState::Unsorted.cycle(Column::Ping).cycle(Column::Ping);
        let s = s.cycle(Column::Speed);
        assert_eq!(
            s,
            SortState::Sorted {
                column: Column::Speed,
                direction: SortDirection::Ascending
            }
        );
        assert_eq!(s.direction_of(Column::Ping), None);
    }

    #[test]
    fn unsorted_follows_input_order() {
        let rows = vec![
            row("c", None, Some(1), None),
            row("b", Some(1), Some(5), None),
            row("a", Some(0), Some(9), None),
        ];
        assert_eq!(sorted(rows, SortState::Unsorted), vec!["a", "b", "c"]);
    }

    #[test]
    fn ping_sort_puts_missing_last_both_ways() {
        let rows = vec![
            row("none", Some(0), None, None),
            row("slow", Some(1), Some(300), None),
            row("fast", Some(2), Some(20), None),
        ];
        let asc = SortState::Unsorted.cycle(Column::Ping);
        assert_eq!(sorted(rows.clone(), asc), vec!["fast", "slow", "none"]);

        let desc = asc.cycle(Column::Ping);
        assert_eq!(sorted(rows, desc), vec!["slow", "fast", "none"]);
    }

    #[test]
    fn speed_sort_puts_missing_last_both_ways() {
        let rows = vec![
            row("none", Some(0), None, None),
            row("quick", Some(1), None, Some(12.5)),
            row("crawl", Some(2), None, Some(0.4)),
        ];
        let asc = SortState::Unsorted.cycle(Column::Speed);
        assert_eq!(sorted(rows.clone(), asc), vec!["crawl", "quick", "none"]);

        let desc = asc.cycle(Column::Speed);
        assert_eq!(sorted(rows, desc), vec!["quick", "crawl", "none"]);
    }

    #[test]
    fn ties_break_on_input_order() {
        let rows = vec![
            row("third", None, Some(50), None),
            row("second", Some(4), Some(50), None),
            row("first", Some(1), Some(50), None),
        ];
        let desc = SortState::Unsorted.cycle(Column::Ping).cycle(Column::Ping);
        assert_eq!(sorted(rows, desc), vec!["first", "second", "third"]);
    }
}
