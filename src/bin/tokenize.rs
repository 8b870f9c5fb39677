//! strata-wp-tokenize: Tokenize text with a BERT WordPiece vocabulary.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use serde::Serialize;

use strata_wordpiece::cli;
use strata_wordpiece::config::{TokenizerConfig, DEFAULT_MAX_LENGTH};
use strata_wordpiece::loader::DEFAULT_VOCAB_KEY;
use strata_wordpiece::tokenizer::{Token, TokenRole};
use strata_wordpiece::TokenizerError;

#[derive(Parser)]
#[command(
    name = "strata-wp-tokenize",
    about = "Tokenize text using a BERT WordPiece vocabulary"
)]
struct Args {
    /// Path to tokenizer.json, vocab.txt, or a directory containing one
    #[arg(short = 't', long)]
    tokenizer: String,

    /// JSON pointer to the vocabulary object inside tokenizer.json
    #[arg(long, default_value = DEFAULT_VOCAB_KEY)]
    vocab_key: String,

    /// Text to tokenize
    #[arg(short = 'p', long, conflicts_with_all = ["file", "stdin"])]
    prompt: Option<String>,

    /// Read text from file
    #[arg(short = 'f', long, conflicts_with = "stdin")]
    file: Option<PathBuf>,

    /// Read text from stdin
    #[arg(long)]
    stdin: bool,

    /// Fixed output length, including [CLS], [SEP] and padding
    #[arg(long, default_value_t = DEFAULT_MAX_LENGTH)]
    max_length: usize,

    /// Output only token IDs in list format: [101, 7592, 102]
    #[arg(long)]
    ids: bool,

    /// Print the number of non-padding tokens
    #[arg(long)]
    show_count: bool,

    /// Output format: text or json
    #[arg(long, default_value = "text", value_parser = validate_output_format)]
    output_format: String,

    /// Suppress all logging
    #[arg(long)]
    log_disable: bool,
}

fn validate_output_format(s: &str) -> Result<String, String> {
    match s {
        "text" | "json" => Ok(s.to_string()),
        _ => Err(format!("Unknown output format '{}'. Options: text, json", s)),
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    tokens: &'a [Token],
    count: usize,
    truncated: bool,
}

fn main() {
    let args = Args::parse();
    cli::init_logging(args.log_disable);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), TokenizerError> {
    let source = cli::source::resolve_tokenizer(&args.tokenizer, &args.vocab_key)?;
    let input = cli::read_input(
        args.prompt.as_deref(),
        args.file.as_deref(),
        args.stdin,
    )?;

    let config = TokenizerConfig {
        max_length: args.max_length,
        ..TokenizerConfig::default()
    };
    let tokenizer = cli::source::build_tokenizer(&source, config)?;
    let sequence = tokenizer.tokenize(&input);

    match args.output_format.as_str() {
        "json" => {
            let output = JsonOutput {
                tokens: sequence.tokens(),
                count: sequence.real_len(),
                truncated: sequence.is_truncated(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            if args.ids {
                let id_strs: Vec<String> = sequence.ids().iter().map(|id| id.to_string()).collect();
                println!("[{}]", id_strs.join(", "));
            } else {
                for (i, token) in sequence.iter().enumerate() {
                    println!(
                        "{:>4} {:>6} {} {:<16} {}",
                        i,
                        token.id,
                        token.attention_mask,
                        format!("'{}'", token.text),
                        role_label(token.role)
                    );
                }
            }

            if let Some(t) = sequence.truncation() {
                println!("Truncated: kept {} of {} tokens", t.kept, t.original_len);
            }
            if args.show_count {
                println!("Total number of tokens: {}", sequence.real_len());
            }
        }
    }

    Ok(())
}

fn role_label(role: TokenRole) -> &'static str {
    match role {
        TokenRole::None => "",
        TokenRole::Padding => "PAD",
        TokenRole::Unknown => "UNK",
        TokenRole::Classification => "CLS",
        TokenRole::Separator => "SEP",
        TokenRole::Mask => "MASK",
    }
}
