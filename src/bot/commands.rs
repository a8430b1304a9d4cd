use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::calc::parse_date;

/// A fully parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    WhatIfDate {
        symbol: String,
        usd_amount: Decimal,
        date: NaiveDate,
    },
    AddPos {
        symbol: String,
        amount: Decimal,
        buy_price: Decimal,
    },
    Portfolio,
    Remove {
        symbol: String,
    },
    Clear,
    Ath {
        symbol: String,
    },
    Gm,
}

impl Command {
    /// Metric label.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::WhatIfDate { .. } => "whatifdate",
            Command::AddPos { .. } => "addpos",
            Command::Portfolio => "portfolio",
            Command::Remove { .. } => "remove",
            Command::Clear => "clear",
            Command::Ath { .. } => "ath",
            Command::Gm => "gm",
        }
    }
}

/// Commands that take arguments, for usage replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    WhatIfDate,
    AddPos,
    Remove,
    Ath,
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Usage::WhatIfDate => write!(
                f,
                "Usage: `/whatifdate SYMBOL USD_AMOUNT YYYY-MM-DD`\nExample: `/whatifdate SOL 1000 2023-01-01`"
            ),
            Usage::AddPos => write!(
                f,
                "Usage: `/addpos SYMBOL AMOUNT BUY_PRICE`\nExample: `/addpos SOL 10 80`"
            ),
            Usage::Remove => write!(f, "Usage: `/remove SYMBOL`\nExample: `/remove SOL`"),
            Usage::Ath => write!(f, "Usage: `/ath SYMBOL`\nExample: `/ath SOL`"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Plain text, not addressed to the bot.
    NotACommand,
    Unknown(String),
    WrongArgs(Usage),
    Invalid(String),
}

fn parse_number(raw: &str, what: &str) -> Result<Decimal, ParseError> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| ParseError::Invalid(format!("{what} must be a number.")))
}

/// Parse a message like `/addpos sol 10 80` or `/ath@MyBot btc`.
pub fn parse_command(text: &str) -> Result<Command, ParseError> {
    let mut parts = text.split_whitespace();
    let head = parts.next().ok_or(ParseError::NotACommand)?;
    let name = head.strip_prefix('/').ok_or(ParseError::NotACommand)?;
    // Group chats address commands as /cmd@BotName
    let name = name.split('@').next().unwrap_or_default().to_ascii_lowercase();
    let args: Vec<&str> = parts.collect();

    match name.as_str() {
        "start" => Ok(Command::Start),
        "help" => Ok(Command::Help),
        "portfolio" => Ok(Command::Portfolio),
        "clear" => Ok(Command::Clear),
        "gm" => Ok(Command::Gm),
        "whatifdate" => match args.as_slice() {
            [symbol, usd, date] => {
                let usd_amount = parse_number(usd, "USD amount")?;
                let date = parse_date(date)
                    .map_err(|_| ParseError::Invalid("Date must be YYYY-MM-DD.".into()))?;
                Ok(Command::WhatIfDate {
                    symbol: symbol.to_string(),
                    usd_amount,
                    date,
                })
            }
            _ => Err(ParseError::WrongArgs(Usage::WhatIfDate)),
        },
        "addpos" => match args.as_slice() {
            [symbol, amount, buy_price] => {
                let (amount, buy_price) = match (
                    parse_number(amount, "Amount"),
                    parse_number(buy_price, "Buy price"),
                ) {
                    (Ok(a), Ok(p)) => (a, p),
                    _ => {
                        return Err(ParseError::Invalid(
                            "Amount and buy price must be numbers.".into(),
                        ))
                    }
                };
                Ok(Command::AddPos {
                    symbol: symbol.to_string(),
                    amount,
                    buy_price,
                })
            }
            _ => Err(ParseError::WrongArgs(Usage::AddPos)),
        },
        "remove" => match args.as_slice() {
            [symbol] => Ok(Command::Remove {
                symbol: symbol.to_string(),
            }),
            _ => Err(ParseError::WrongArgs(Usage::Remove)),
        },
        "ath" => match args.as_slice() {
            [symbol] => Ok(Command::Ath {
                symbol: symbol.to_string(),
            }),
            _ => Err(ParseError::WrongArgs(Usage::Ath)),
        },
        "" => Err(ParseError::NotACommand),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_addpos() {
        assert_eq!(
            parse_command("/addpos sol 10 80.5").unwrap(),
            Command::AddPos {
                symbol: "sol".into(),
                amount: dec!(10),
                buy_price: dec!(80.5),
            }
        );
    }

    #[test]
    fn test_parse_whatifdate() {
        let cmd = parse_command("/whatifdate ETH 1000 2020-03-13").unwrap();
        assert_eq!(
            cmd,
            Command::WhatIfDate {
                symbol: "ETH".into(),
                usd_amount: dec!(1000),
                date: NaiveDate::from_ymd_opt(2020, 3, 13).unwrap(),
            }
        );
        assert_eq!(cmd.name(), "whatifdate");
    }

    #[test]
    fn test_bot_mention_is_ignored() {
        assert_eq!(parse_command("/ATH@WhatIfBot btc").unwrap(), Command::Ath { symbol: "btc".into() });
        assert_eq!(parse_command("/portfolio@WhatIfBot").unwrap(), Command::Portfolio);
    }

    #[test]
    fn test_wrong_arg_count_yields_usage() {
        assert_eq!(
            parse_command("/addpos sol 10"),
            Err(ParseError::WrongArgs(Usage::AddPos))
        );
        assert_eq!(parse_command("/remove"), Err(ParseError::WrongArgs(Usage::Remove)));
        assert_eq!(
            parse_command("/whatifdate sol 1000 2023-01-01 extra"),
            Err(ParseError::WrongArgs(Usage::WhatIfDate))
        );
    }

    #[test]
    fn test_bad_numbers_and_dates() {
        assert_eq!(
            parse_command("/addpos sol ten 80"),
            Err(ParseError::Invalid("Amount and buy price must be numbers.".into()))
        );
        assert_eq!(
            parse_command("/whatifdate sol lots 2023-01-01"),
            Err(ParseError::Invalid("USD amount must be a number.".into()))
        );
        assert_eq!(
            parse_command("/whatifdate sol 100 2023-13-01"),
            Err(ParseError::Invalid("Date must be YYYY-MM-DD.".into()))
        );
    }

    #[test]
    fn test_scientific_amounts() {
        assert_eq!(
            parse_command("/addpos pepe 1e6 0.0000012").unwrap(),
            Command::AddPos {
                symbol: "pepe".into(),
                amount: dec!(1000000),
                buy_price: dec!(0.0000012),
            }
        );
    }

    #[test]
    fn test_not_a_command() {
        assert_eq!(parse_command("gm frens"), Err(ParseError::NotACommand));
        assert_eq!(parse_command(""), Err(ParseError::NotACommand));
        assert_eq!(parse_command("/"), Err(ParseError::NotACommand));
        assert_eq!(parse_command("/moon"), Err(ParseError::Unknown("moon".into())));
    }
}
