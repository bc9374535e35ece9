//! List phases command implementation.

use deploy_audit_phases::all_phases;

/// Runs the list-phases command.
pub fn run() {
    println!("Available phases (in execution order):\n");
    println!("{:<8} {:<14} Description", "Code", "Name");
    println!("{}", "-".repeat(80));

    for phase in all_phases() {
        println!(
            "{:<8} {:<14} {}",
            phase.code(),
            phase.name(),
            phase.description()
        );
    }

    println!("\nA summary step runs after the phases and derives recommendations.");
    println!("\nRun a subset with --phases, e.g.:");
    println!("  deploy-audit check --phases compose,DA004");
    println!("\nDisable a phase in deploy-audit.toml, e.g.:");
    println!("  [phases.monitoring]");
    println!("  enabled = false");
}
