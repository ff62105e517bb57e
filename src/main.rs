use errors::AppResult;
use nvd_mirror::{cli, errors};

fn main() -> AppResult<()> {
    cli::init_tracing();

    // Feeds are processed one after another; a single thread is enough
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| errors::AppError::IoError(e.to_string()))?;

    rt.block_on(cli::cli())
}
