use cmake_targets_core::config::ConfigIssue;
use cmake_targets_core::{Diagnostic, ProjectLocation, TargetDescriptor};

/// `configured` is whether the cache records a generator
pub fn print_targets(location: &ProjectLocation, targets: &[TargetDescriptor], configured: bool) {
    println!("🔍 Source: {}", location.source_dir().display());
    println!("   📁 Build: {}", location.build_dir().display());
    println!("{}", "=".repeat(80));

    for target in targets {
        println!("\n🎯 {}", target.name);
        println!("   🔧 {}", target.to_shell_command());
        println!("   📂 cwd: {}", target.cwd.display());
    }

    if !configured {
        println!("\n💡 Not configured yet, run `generate` to list build targets");
    }
}

pub fn print_targets_json(targets: &[TargetDescriptor]) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(targets)?);
    Ok(())
}

pub fn print_issues(issues: &[ConfigIssue]) {
    for issue in issues {
        println!("   ⚠️  {}", issue);
    }
}

pub fn print_diagnostics(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    println!("\n❌ {} error(s):", diagnostics.len());
    for d in diagnostics {
        let position = match d.column {
            Some(column) => format!("{}:{}:{}", d.file, d.line, column),
            None => format!("{}:{}", d.file, d.line),
        };
        match &d.message {
            Some(message) => println!("   {position}: {message}"),
            None => println!("   {position}"),
        }
    }
}
