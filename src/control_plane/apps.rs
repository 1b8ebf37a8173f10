// ABOUTME: Application summaries returned by the inventory listing.
// ABOUTME: Parses the table printed by `cf apps` into AppSummary rows.

/// One row of the control plane's application listing.
///
/// Only `name` is guaranteed; state and counts are zero/empty when the
/// control plane does not report them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppSummary {
    pub name: String,
    pub state: String,
    pub running_instances: u32,
    pub total_instances: u32,
}

impl AppSummary {
    /// A summary carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style state and instance counts.
    pub fn with_instances(mut self, state: &str, running: u32, total: u32) -> Self {
        self.state = state.to_string();
        self.running_instances = running;
        self.total_instances = total;
        self
    }
}

/// Parse `cf apps` output.
///
/// Rows follow the `name  requested state  ...` header. The third column is
/// either `R/T` (v6) or a process list such as `web:R/T, worker:R/T` (v7+),
/// in which case the first process is used.
pub fn parse_apps_table(lines: &[String]) -> Vec<AppSummary> {
    let mut rows = lines
        .iter()
        .flat_map(|chunk| chunk.lines())
        .skip_while(|line| !is_header(line));

    // Skip the header itself
    rows.next();

    rows.filter_map(|line| {
        let mut columns = line.split_whitespace();
        let name = columns.next()?;
        let state = columns.next().unwrap_or_default();
        let (running, total) = columns
            .next()
            .and_then(parse_instances)
            .unwrap_or((0, 0));

        Some(AppSummary {
            name: name.to_string(),
            state: state.to_string(),
            running_instances: running,
            total_instances: total,
        })
    })
    .collect()
}

fn is_header(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with("name") && line.contains("requested state")
}

/// Parse `R/T`, tolerating a `process:` prefix and trailing comma.
pub(crate) fn parse_instances(token: &str) -> Option<(u32, u32)> {
    let token = token.trim_end_matches(',');
    let token = token.rsplit_once(':').map_or(token, |(_, counts)| counts);
    let (running, total) = token.split_once('/')?;
    Some((running.trim().parse().ok()?, total.trim().parse().ok()?))
}
