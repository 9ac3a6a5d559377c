//! ログ初期化
//!
//! `RUST_LOG` が設定されていればそれを使い、なければ `--verbose` に応じて
//! info / debug を出力する。進捗表示（stdout）と混ざらないよう stderr に出す。

use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) {
    let default_filter = if verbose { "terralys=debug" } else { "terralys=info" };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
