//! Output formatting for stubgen
//!
//! Every command ends by printing its [`PassSummary`], as text or as JSON.

use anyhow::Result;
use variant_stubgen::PassSummary;

pub fn print_summary(command: &str, summary: &PassSummary, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "success": true,
                "command": command,
                "failed": summary.failure_count(),
                "excluded": summary.exclusion_count(),
                "summary": summary,
            }))?
        );
        return Ok(());
    }

    println!("{}", summary.to_text());
    Ok(())
}

pub fn print_error(command: &str, err: &anyhow::Error) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "success": false,
            "command": command,
            "error": format!("{:#}", err),
        }))?
    );
    Ok(())
}
