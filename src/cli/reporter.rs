// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use super::MeshInventory;
use crate::export::ExportSummary;
use crate::geometry::BoundingBox;
use crate::topology::{CheckReport, EntityCounts, EntityRef};
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report a finished export
    pub fn report_summary(summary: &ExportSummary, duration: Duration) {
        Self::rule();
        println!(
            "{} {}",
            "Exported:".bold(),
            summary.output.display().to_string().cyan()
        );
        Self::rule();

        if summary.is_clean() {
            println!("{} {}", "✅".green(), "Export completed cleanly".green().bold());
        } else {
            println!(
                "{} {}",
                "⚠️".yellow(),
                "Export completed with warnings".yellow().bold()
            );
        }

        println!("\n{}", "Topology:".bold());
        Self::print_counts(&summary.counts);
        Self::print_field("Mesh entities", summary.mesh_entities.to_string());

        println!("\n{}", "Faceting:".bold());
        Self::print_failures("Failed curves", &summary.failed_curves);
        Self::print_failures("Failed surfaces", &summary.failed_surfaces);
        Self::print_count("Curve end warnings", summary.curve_end_warnings);
        Self::print_count("Suppressed warnings", summary.suppressed_curve_warnings);
        Self::print_count("Inconsistent curves", summary.inconsistent_curves);
        Self::print_count("Coincident vertices", summary.ambiguous_coincidences);
        Self::print_count("Unmapped links", summary.unmapped_links);
        Self::print_count("Unresolved members", summary.unresolved_group_members);

        println!("\n{}", "Performance:".bold());
        Self::print_field("Time", Self::format_duration(duration).yellow().to_string());
        Self::rule();
    }

    /// Report the result of a model check
    pub fn report_check(file: &str, report: &CheckReport) {
        Self::rule();
        println!("{} {}", "Checked:".bold(), file.cyan());
        Self::rule();
        Self::print_counts(&report.counts);
        Self::print_bounds(&report.bounds);

        if report.is_ok() {
            println!("\n{} {}", "✅".green(), "No issues found".green().bold());
        } else {
            println!(
                "\n{} {}",
                "❌".red(),
                format!("{} issues found", report.issues.len()).red().bold()
            );
            for issue in &report.issues {
                println!("  {} {}", "-".bright_black(), issue);
            }
        }
        Self::rule();
    }

    /// Print unique ids in assignment order
    pub fn report_uids(ids: &[(EntityRef, i32)]) {
        for (entity, id) in ids {
            println!(
                "  {} {} {}",
                format!("{:>6}", id).cyan(),
                format!("{:<8}", entity.dimension().category()).bright_black(),
                entity
            );
        }
        println!("{} {}", "Total:".bold(), ids.len());
    }

    /// Report the contents of a mesh file
    pub fn report_inspect(file: &str, inventory: &MeshInventory) {
        Self::rule();
        println!("{} {}", "Mesh:".bold(), file.cyan());
        Self::rule();

        println!("{}", "Entity-sets:".bold());
        for (category, count) in &inventory.categories {
            Self::print_field(category, count.to_string().cyan().to_string());
        }
        Self::print_field("Total sets", inventory.sets.to_string());

        println!("\n{}", "Elements:".bold());
        Self::print_field("Points", inventory.vertices.to_string().cyan().to_string());
        Self::print_field("Edges", inventory.edges.to_string().cyan().to_string());
        Self::print_field("Triangles", inventory.triangles.to_string().cyan().to_string());
        Self::print_bounds(&inventory.bounds);

        println!("\n{}", "Tolerances:".bold());
        Self::print_field("Faceting", Self::format_tolerance(inventory.faceting_tolerance));
        Self::print_field("Resabs", Self::format_tolerance(inventory.geometry_resabs));
        Self::rule();
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    fn rule() {
        println!("{}", "━".repeat(80).bright_black());
    }

    fn print_counts(counts: &EntityCounts) {
        Self::print_field("Volumes", counts.bodies.to_string().cyan().to_string());
        Self::print_field("Surfaces", counts.faces.to_string().cyan().to_string());
        Self::print_field("Curves", counts.edges.to_string().cyan().to_string());
        Self::print_field("Vertices", counts.vertices.to_string().cyan().to_string());
        Self::print_field("Groups", counts.groups.to_string().cyan().to_string());
    }

    fn print_bounds(bounds: &BoundingBox) {
        if bounds.is_empty() {
            Self::print_field("Bounds", "empty".bright_black().to_string());
            return;
        }
        Self::print_field(
            "Bounds",
            format!(
                "[{:.3}, {:.3}, {:.3}] .. [{:.3}, {:.3}, {:.3}]",
                bounds.min.x, bounds.min.y, bounds.min.z, bounds.max.x, bounds.max.y, bounds.max.z
            ),
        );
        Self::print_field("Diagonal", format!("{:.3}", bounds.diagonal()));
    }

    fn print_field(name: &str, value: String) {
        println!("  {} {}", format!("{}:", name).bright_black(), value);
    }

    /// Zero in green, anything else in yellow
    fn print_count(name: &str, count: usize) {
        let value = if count == 0 {
            count.to_string().green()
        } else {
            count.to_string().yellow()
        };
        Self::print_field(name, value.to_string());
    }

    fn print_failures(name: &str, ids: &[i32]) {
        if ids.is_empty() {
            Self::print_field(name, "0".green().to_string());
        } else {
            Self::print_field(
                name,
                format!("{} {:?}", ids.len(), ids).red().to_string(),
            );
        }
    }

    fn format_tolerance(value: Option<f64>) -> String {
        match value {
            Some(v) => format!("{:e}", v),
            None => "not set".bright_black().to_string(),
        }
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}
