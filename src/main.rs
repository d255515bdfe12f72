use anyhow::Context;
use filter_grammar::GrammarConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "grammar.json";

/// 加载配置，优先使用JSON配置文件，失败时使用默认配置
fn load_config(path: &str) -> GrammarConfig {
    match GrammarConfig::from_json_file(path) {
        Ok(config) => {
            info!(
                path,
                entities = config.entities.len(),
                attributes = config.attributes.len(),
                "loaded grammar config"
            );
            config
        }
        Err(e) => {
            warn!("{e}, falling back to the default config");
            GrammarConfig::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    // 日志输出到stderr，stdout只输出语法JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = load_config(&path);

    let grammar = config
        .build_grammar()
        .context("failed to generate the filter grammar")?;
    grammar
        .validate_patterns()
        .context("generated grammar contains an invalid literal pattern")?;

    println!("{}", grammar.to_json_pretty()?);
    Ok(())
}
