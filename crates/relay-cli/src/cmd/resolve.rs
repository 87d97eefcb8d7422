use anyhow::Result;

use relay_core::config::GatewayConfig;
use relay_core::persona::normalize_groups;

use crate::output;

pub async fn run(config: GatewayConfig, groups: Vec<String>, json: bool) -> Result<()> {
    let dispatcher = super::dispatcher(config);
    let groups = normalize_groups(&groups);
    let persona = dispatcher.personas().resolve(&groups).await?;

    if json {
        output::print_json(&serde_json::json!({
            "personaId": persona.id,
            "persona": &*persona,
        }))?;
        return Ok(());
    }

    println!("persona: {} ({})", persona.id, persona.name);
    println!("tone: {}", persona.tone);
    if !persona.preferred_sources.is_empty() {
        println!("preferred sources:");
        for source in &persona.preferred_sources {
            println!("  - {source}");
        }
    }
    for line in &persona.answer_guidance {
        println!("guidance: {line}");
    }
    Ok(())
}
