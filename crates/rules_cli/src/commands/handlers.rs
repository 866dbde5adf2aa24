use anyhow::Result;
use rules_core::CapabilityProvider;

pub fn execute() -> Result<()> {
    let registry = rules_handlers::registry();

    println!("Built-in handlers:");
    for name in registry.names() {
        let kind = registry.get(&name)?.kind();
        let message = registry.message(&name).unwrap_or_default();
        println!("  {:<16} {:<12} {}", name, kind, message);
    }

    Ok(())
}
