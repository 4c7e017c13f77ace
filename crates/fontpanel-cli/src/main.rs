use clap::Parser;
use fontpanel_cli::{CliArgs, FontPanelCli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let cli = FontPanelCli::from_args("fontpanel", &args)?;
    cli.run(args).await?;
    Ok(())
}
