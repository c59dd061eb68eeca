use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    jetbrains_diff_lib::init_tracing();
    jetbrains_diff_lib::cli::run().await
}
