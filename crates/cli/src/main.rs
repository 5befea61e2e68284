//! # Profiles Endpoint CLI
//!
//! 運用者向けのコマンド。
//!
//! - `keygen` — `SIGNING_KEY` に設定するPKCS#1秘密鍵を生成する
//! - `public-key` — クライアントに配布する検証用公開鍵をエクスポートする

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use profiles_core::{LocalSigner, ProfileSigner};

/// Profiles Endpoint 運用CLI
#[derive(Parser, Debug)]
#[command(name = "profiles-cli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 署名用のRSA秘密鍵（PKCS#1 PEM）を生成する
    Keygen {
        /// 鍵のビット長
        #[arg(long, default_value_t = profiles_crypto::DEFAULT_KEY_BITS)]
        bits: usize,
        /// 出力先（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 署名鍵に対応する公開鍵をエクスポートする
    PublicKey {
        /// 秘密鍵PEMファイル（省略時は環境変数 SIGNING_KEY）
        #[arg(short, long)]
        key_file: Option<PathBuf>,
        /// 出力形式（"der" または "pem"）
        #[arg(short, long, default_value = "pem")]
        format: String,
        /// 出力先（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Keygen { bits, output } => {
            let key = profiles_crypto::generate_private_key(bits)?;
            let pem = profiles_crypto::encode_private_key_pem(&key)?;
            write_output(output.as_deref(), pem.as_bytes())
        }
        Commands::PublicKey {
            key_file,
            format,
            output,
        } => {
            let pem = read_signing_key(key_file.as_deref())?;
            let signer = LocalSigner::new(profiles_crypto::parse_private_key_pem(&pem)?);
            let public_key = signer.get_public_key(&format)?;
            eprintln!(
                "fingerprint (sha256): {}",
                profiles_crypto::public_key_fingerprint(signer.public_key())?
            );
            write_output(output.as_deref(), &public_key)
        }
    }
}

/// 秘密鍵PEMをファイルまたは環境変数から読み込む。
fn read_signing_key(key_file: Option<&Path>) -> anyhow::Result<String> {
    match key_file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("{} を読み込めません: {e}", path.display())),
        None => std::env::var("SIGNING_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("--key-file または SIGNING_KEY を指定してください")),
    }
}

fn write_output(output: Option<&Path>, bytes: &[u8]) -> anyhow::Result<()> {
    match output {
        Some(path) => std::fs::write(path, bytes)
            .map_err(|e| anyhow::anyhow!("{} に書き込めません: {e}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
            Ok(())
        }
    }
}
