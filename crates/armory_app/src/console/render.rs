use armory_core::{CategoryStatus, ConsoleViewModel, OperationPhase};
use armory_engine::{InventoryStats, NewsArticle, StatLine, UnitRecord};

const PROGRESS_BAR_WIDTH: usize = 40;

/// Renders the operation console for one view snapshot, one line per entry.
pub fn render_mission(view: &ConsoleViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    match view.phase {
        OperationPhase::Idle => {
            lines.push("MILITARY DATA SCRAPING CONSOLE".to_string());
            if let Some(error) = &view.form_error {
                lines.push(format!("! {error}"));
            }
        }
        OperationPhase::Submitting | OperationPhase::Running => {
            lines.push(format!(
                "OPERATION STATUS: ACTIVE  {:>3}%",
                view.progress.round() as u32
            ));
            lines.push(progress_bar(view.progress));
            if let Some(message) = &view.status_message {
                lines.push(format!("STATUS: {message}"));
            }
            if let Some(target) = &view.current_target {
                lines.push(format!("CURRENT TARGET: {}", target.to_uppercase()));
            }
            if !view.categories.is_empty() {
                lines.push("ACQUISITION PROGRESS:".to_string());
                for row in &view.categories {
                    lines.push(format!(
                        "  {:<12} {} ({} RECORDS)",
                        row.name.to_uppercase(),
                        status_label(row.status),
                        row.count
                    ));
                }
            }
        }
        OperationPhase::Completed => {
            lines.push("OPERATION COMPLETED SUCCESSFULLY".to_string());
            lines.push("MISSION SUMMARY:".to_string());
            for row in &view.categories {
                lines.push(format!(
                    "  {:<12} {} RECORDS ACQUIRED",
                    row.name.to_uppercase(),
                    row.count
                ));
            }
        }
        OperationPhase::Error => {
            lines.push("OPERATION FAILED".to_string());
            if let Some(error) = &view.error {
                lines.push(format!("! {error}"));
            }
        }
    }

    lines
}

pub fn render_news(articles: &[NewsArticle]) -> Vec<String> {
    let mut lines = vec!["GLOBAL MILITARY INTELLIGENCE BRIEFING".to_string()];
    if articles.is_empty() {
        lines.push("No intel reports available.".to_string());
        return lines;
    }
    for (index, article) in articles.iter().enumerate() {
        lines.push(format!(
            "[{:>2}] {}  ({} / {})",
            index + 1,
            article.title,
            article.source,
            article.published
        ));
        if let Some(description) = &article.description {
            lines.push(format!("     {description}"));
        }
    }
    lines
}

/// `rows` is the filtered selection; `stats` covers the whole dataset, the
/// way the grid pages report them.
pub fn render_inventory(rows: &[&UnitRecord], total: usize, stats: &InventoryStats) -> Vec<String> {
    let shown_units: u64 = rows.iter().map(|unit| unit.units).sum();
    let mut lines = vec![format!(
        "DISPLAYING {} OF {} UNIT TYPES ({} UNITS)",
        rows.len(),
        total,
        shown_units
    )];
    for unit in rows {
        lines.push(format!(
            "  {:<16} {:<16} {:<12} {:<18} {:>5} units  [{}]",
            unit.name, unit.model, unit.service, unit.role, unit.units, unit.country
        ));
    }
    lines.push("BY SERVICE:".to_string());
    for (service, units) in &stats.by_service {
        lines.push(format!("  {service:<18} {units}"));
    }
    lines.push("BY ROLE:".to_string());
    for (role, units) in &stats.by_role {
        lines.push(format!("  {role:<18} {units}"));
    }
    lines.push("BY ORIGIN:".to_string());
    for (country, units) in &stats.by_country {
        lines.push(format!("  {country:<18} {units}"));
    }
    lines
}

pub fn render_stats(country: &str, stats: &[StatLine]) -> Vec<String> {
    let mut lines = vec![format!("{} - MILITARY OVERVIEW", country.to_uppercase())];
    for stat in stats {
        lines.push(format!("  {:<20} {}", stat.label, stat.value));
    }
    lines
}

pub fn render_mission_log(view: &ConsoleViewModel) -> Vec<String> {
    let mut lines = vec!["MISSION LOG:".to_string()];
    if view.missions.is_empty() {
        lines.push("  No completed operations.".to_string());
        return lines;
    }
    for mission in &view.missions {
        lines.push(format!(
            "  {:<16} {:<12} {} RECORDS",
            mission.country.to_uppercase(),
            mission.power.label(),
            mission.records
        ));
    }
    lines
}

fn progress_bar(progress: f64) -> String {
    let filled = ((progress / 100.0) * PROGRESS_BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(PROGRESS_BAR_WIDTH);
    format!(
        "[{}{}]",
        "#".repeat(filled),
        ".".repeat(PROGRESS_BAR_WIDTH - filled)
    )
}

fn status_label(status: CategoryStatus) -> &'static str {
    match status {
        CategoryStatus::Pending => "PENDING",
        CategoryStatus::Success => "SUCCESS",
        CategoryStatus::Failed => "FAILED",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armory_core::{update, ConsoleState, Msg, PowerCategory};

    fn submitted_console() -> ConsoleState {
        let state = ConsoleState::new();
        let (state, _) = update(state, Msg::CountryInput("india".to_string()));
        let (state, _) = update(state, Msg::PowerSelected(PowerCategory::Airpower));
        let (state, _) = update(state, Msg::SubmitClicked);
        state
    }

    #[test]
    fn active_view_shows_progress_bar_and_status() {
        let state = submitted_console();
        let lines = render_mission(&state.view());

        assert!(lines[0].starts_with("OPERATION STATUS: ACTIVE"));
        assert!(lines[1].starts_with('['));
        assert!(lines
            .iter()
            .any(|line| line.contains("Initializing scraping operation")));
    }

    #[test]
    fn full_bar_at_one_hundred_percent() {
        assert_eq!(progress_bar(100.0), format!("[{}]", "#".repeat(40)));
        assert_eq!(progress_bar(0.0), format!("[{}]", ".".repeat(40)));
    }

    #[test]
    fn idle_view_surfaces_form_errors() {
        let state = ConsoleState::new();
        let (state, _) = update(state, Msg::SubmitClicked);
        let lines = render_mission(&state.view());

        assert!(lines.iter().any(|line| line.contains("Country name is required")));
    }
}
