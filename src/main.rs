//! notify-mcp server binary.
//!
//! Model Context Protocol server that lets an LLM-driven assistant alert
//! the human operator about lifecycle events (task start/complete, input
//! needed, tool permission needed) through desktop banners and sound cues.

use clap::Parser;
use rmcp::ServiceExt;
use tracing_subscriber::EnvFilter;

use notify_mcp::config::NotifyConfig;
use notify_mcp::dispatch::Dispatcher;
use notify_mcp::server::NotifyMcpServer;

#[derive(Debug, Parser)]
#[command(name = "notify-mcp", version, about = "MCP server for desktop task notifications")]
struct Args {
    /// Disable the visual channel for this process, overriding NOTIFY_VISUAL.
    #[arg(long)]
    no_visual: bool,

    /// Probe sound files and notification mechanisms, then exit.
    #[arg(long)]
    verify: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the MCP transport; all logging goes to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("notify_mcp=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = NotifyConfig::from_env();
    if args.no_visual {
        config.visual_enabled = false;
    }

    let dispatcher = Dispatcher::new(config);
    dispatcher.verify();
    if args.verify {
        return Ok(());
    }

    tracing::info!("notify-mcp starting (stdio transport)");

    let server = NotifyMcpServer::new(dispatcher);
    let transport = rmcp::transport::io::stdio();

    let service = server.serve(transport).await?;
    service.waiting().await?;

    Ok(())
}
