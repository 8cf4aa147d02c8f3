use anyhow::Error;

use padcatch_rust::padcatch_opts::PadcatchOpts;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    PadcatchOpts::process_args().await
}
