//! Output rendering and formatting

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};
use console::{Style, Term};
use pyfreeze_types::{BuildPlan, BuildReport, BuilderKind, ColorChoice};
use std::io;
use std::path::Path;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Color configuration
    color_choice: ColorChoice,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool, color_choice: ColorChoice) -> Self {
        Self {
            json_output,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Render a resolved plan
    pub fn render_plan(&self, plan: &BuildPlan) -> io::Result<()> {
        if self.json_output {
            let json = serde_json::to_string_pretty(plan).map_err(io::Error::other)?;
            println!("{json}");
            return Ok(());
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        if self.supports_color() {
            table.set_header(vec![
                Cell::new("Setting").add_attribute(Attribute::Bold),
                Cell::new("Value").add_attribute(Attribute::Bold),
            ]);
        } else {
            table.set_header(vec!["Setting", "Value"]);
        }

        let builders = plan
            .builders
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ");

        let rows: Vec<(&str, String)> = vec![
            ("Repository", plan.repo_root.display().to_string()),
            (
                "Entry",
                format!("{} ({})", plan.display_path(&plan.entry_script), plan.entry_source),
            ),
            ("Toolkit", plan.toolkit.to_string()),
            ("Plugins", list_or_none(&plan.plugin_names)),
            ("Builders", builders),
            (
                "Layout",
                if plan.one_file { "onefile" } else { "onedir" }.to_string(),
            ),
            (
                "Console",
                if plan.hide_console { "hidden" } else { "shown" }.to_string(),
            ),
            ("Icon", optional_path(plan, plan.icon_path.as_deref())),
            ("Data", optional_path(plan, plan.data_dir.as_deref())),
            ("Dependencies", plan.dependency_set.to_string()),
            ("Requirements", optional_path(plan, plan.requirements.as_deref())),
            ("Extra modules", list_or_none(&plan.extra_modules)),
            ("Name", plan.app_name.clone()),
            ("Dist", plan.display_path(&plan.dist_dir).into_owned()),
            ("UPX", optional_path(plan, plan.upx_dir.as_deref())),
        ];
        for (key, value) in rows {
            table.add_row(vec![key.to_string(), value]);
        }

        println!("{table}");
        Ok(())
    }

    /// Render the commands a build would run
    pub fn render_dry_run(
        &self,
        environment: &[String],
        builders: &[(BuilderKind, String)],
    ) -> io::Result<()> {
        if environment.is_empty() {
            self.term.write_line("# environment: reused as is")?;
        } else {
            self.term.write_line("# environment")?;
            for command in environment {
                self.term.write_line(command)?;
            }
        }
        for (index, (kind, command)) in builders.iter().enumerate() {
            let stage = if index == 0 { "primary" } else { "fallback" };
            self.term.write_line(&format!("# {stage}: {kind}"))?;
            self.term.write_line(command)?;
        }
        Ok(())
    }

    /// Render build report
    pub fn render_build_report(&self, report: &BuildReport) -> io::Result<()> {
        if self.json_output {
            let json = serde_json::to_string_pretty(report).map_err(io::Error::other)?;
            println!("{json}");
            return Ok(());
        }

        println!("{}", self.style_heading("Build Summary"));
        println!();
        println!("Builder:  {}", report.builder);
        if report.used_fallback {
            println!("Fallback: yes");
        }
        println!("Output:   {}", report.artifact.display());
        println!("Size:     {}", format_size(report.size_bytes));
        println!("Duration: {}", format_duration(report.duration_ms));
        Ok(())
    }

    fn style_heading(&self, text: &str) -> String {
        if self.supports_color() {
            Style::new().bold().green().apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Check if color output is supported
    fn supports_color(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

fn optional_path(plan: &BuildPlan, path: Option<&Path>) -> String {
    path.map_or_else(|| "none".to_string(), |p| plan.display_path(p).into_owned())
}

/// Format byte size in human readable format
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{size:.0} {}", UNITS[unit_index])
    } else {
        format!("{size:.1} {}", UNITS[unit_index])
    }
}

fn format_duration(ms: u64) -> String {
    let secs = ms / 1000;
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}.{}s", secs, (ms % 1000) / 100)
    }
}
