// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("crawldb")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Crawl database maintenance with atomic generation installs")
        .subcommand_required(true)
        .subcommand(
            Command::new("convert")
                .about("Convert a database from the legacy key encoding to the text encoding")
                .arg(
                    Arg::new("old_db")
                        .required(true)
                        .help("Database whose current generation uses the legacy key encoding"),
                )
                .arg(
                    Arg::new("new_db")
                        .required(true)
                        .help("Database that receives the converted store as its current generation"),
                )
                .arg(
                    Arg::new("with_metadata")
                        .long("with-metadata")
                        .action(ArgAction::SetTrue)
                        .help("Also rewrite legacy-encoded metadata keys to the text encoding"),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "zsh", "fish", "powershell"])
                        .help("Shell to generate completions for"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("crawldb.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
