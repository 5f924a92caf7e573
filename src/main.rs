/*
 * SPDX-FileCopyrightText: © 2026 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! CLI: run the total-amount extractor over OCR text dumps.

use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use receipt_total_ocr::extract_amount;

/// Extract the payable total from Korean receipt OCR text
#[derive(Parser)]
#[command(name = "receipt-total-ocr")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Emit the full extraction result as JSON
    #[arg(long)]
    json: bool,

    /// OCR text dump files; reads one blob from stdin when empty
    files: Vec<PathBuf>,
}

fn main() -> Result<(), String> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.files.is_empty() {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| format!("stdin 읽기 오류: {}", e))?;
        report(None, &text, cli.json);
        return Ok(());
    }

    for path in &cli.files {
        let label = path.display().to_string();
        match std::fs::read_to_string(path) {
            Ok(text) => report(Some(&label), &text, cli.json),
            Err(e) => log::error!("{}: 파일 읽기 오류: {}", label, e),
        }
    }
    Ok(())
}

fn report(path: Option<&str>, text: &str, json: bool) {
    let result = extract_amount(Some(text));
    let label = path.unwrap_or("-");
    if json {
        match serde_json::to_string(&result) {
            Ok(line) => println!("{}", line),
            Err(e) => log::error!("{}: JSON 직렬화 오류: {}", label, e),
        }
    } else {
        match &result.amount {
            Some(amount) => println!("{}: {}원", label, amount),
            None => println!("{}: 금액을 찾을 수 없습니다", label),
        }
    }
}
