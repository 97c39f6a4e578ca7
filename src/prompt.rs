use std::io::{self, BufRead, Write};

use bigdecimal::BigDecimal;

use crate::config::{DEFAULT_TRANSFER_AMOUNT, RepeatMode, parse_amount};

fn ask(input: &mut impl BufRead, output: &mut impl Write, question: &str) -> io::Result<String> {
    write!(output, "{question}")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer)
}

pub fn ask_repeat_mode(
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<RepeatMode> {
    let answer = ask(input, output, "🔄 Run forever? (y/n): ")?;
    Ok(RepeatMode::from_answer(&answer))
}

pub fn ask_amount(input: &mut impl BufRead, output: &mut impl Write) -> io::Result<BigDecimal> {
    let question = format!("💎 Amount of TEA to send (recommended {DEFAULT_TRANSFER_AMOUNT}): ");
    let answer = ask(input, output, &question)?;
    Ok(parse_amount(&answer))
}
