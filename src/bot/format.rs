//! Telegram (legacy Markdown) renderings of calculator results.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{AthReport, PortfolioSummary, Position, RiskScore, WhatIf};

fn round(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// `1234567.891` -> `1,234,567.89`
pub fn format_usd(value: Decimal) -> String {
    let fixed = format!("{:.2}", round(value, 2));
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{frac_part}")
}

/// Unit prices keep four decimals so sub-cent tokens stay readable.
pub fn format_price(value: Decimal) -> String {
    if value < Decimal::ONE && !value.is_zero() {
        // Significant digits matter more than grouping below a dollar.
        return format!("${}", value.round_sf(4).unwrap_or(value).normalize());
    }
    format!("${:.4}", round(value, 4))
}

pub fn format_amount(value: Decimal) -> String {
    value.normalize().to_string()
}

pub fn format_pct(value: Decimal) -> String {
    format!("{:.2}%", round(value, 2))
}

/// `$1.2B`, `$340.5M`, `$12.0K`, `N/A` when unknown.
pub fn format_mcap(value: Option<Decimal>) -> String {
    let Some(v) = value else {
        return "N/A".into();
    };
    let thousand = Decimal::ONE_THOUSAND;
    let million = thousand * thousand;
    let billion = million * thousand;

    if v >= billion {
        format!("${:.1}B", round(v / billion, 1))
    } else if v >= million {
        format!("${:.1}M", round(v / million, 1))
    } else if v >= thousand {
        format!("${:.1}K", round(v / thousand, 1))
    } else {
        format!("${:.0}", round(v, 0))
    }
}

/// Place external text (token names from the price API) inside a `*bold*`
/// span. Legacy Markdown has no escapes within an entity, so each control
/// character closes the span, appears escaped, and reopens it.
pub fn escape_in_bold(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '_' | '*' | '`' | '[') {
            out.push_str("*\\");
            out.push(ch);
            out.push('*');
        } else {
            out.push(ch);
        }
    }
    out
}

pub fn pnl_emoji(pnl: Decimal) -> &'static str {
    if pnl > Decimal::ZERO {
        "🟢"
    } else if pnl < Decimal::ZERO {
        "🔴"
    } else {
        "⚪️"
    }
}

fn risk_line(risk: Option<RiskScore>) -> String {
    match risk {
        Some(r) => format!("• Degen risk: `{:.1}/10` – {}\n", r.score, r.tier.label()),
        None => String::new(),
    }
}

pub fn welcome() -> String {
    [
        "👋 *Welcome to the What-If Profit/Loss Bot!*",
        "",
        "Core commands:",
        "• `/whatifdate SYMBOL USD_AMOUNT YYYY-MM-DD`",
        "• `/addpos SYMBOL AMOUNT BUY_PRICE`",
        "• `/portfolio` – view all positions",
        "• `/ath SYMBOL` – all-time high info",
        "• `/clear` – clear your portfolio",
        "• `/remove SYMBOL` – remove one token",
        "",
        "Extra:",
        "• `/gm` – degen-style good morning",
    ]
    .join("\n")
}

pub fn what_if(res: &WhatIf, name: &str, market_cap: Option<Decimal>, risk: Option<RiskScore>) -> String {
    format!(
        "{emoji} *If you invested {usd} in {name} on {date}:*\n\n\
         • Symbol: `{symbol}`\n\
         • Buy price (that day): `{buy}`\n\
         • Tokens bought: `{units}`\n\
         • Current price: `{current}`\n\
         • Market cap (now): `{mcap}`\n\
         {risk}\n\
         • Initial value: `{usd}`\n\
         • Current value: `{value}`\n\
         • Multiple: `{multiple}x`\n\n\
         • Profit/Loss: `{profit}` ({pct})",
        emoji = pnl_emoji(res.profit_abs),
        usd = format_usd(res.usd_amount),
        name = escape_in_bold(name),
        date = res.past_date,
        symbol = res.symbol,
        buy = format_price(res.historical_price),
        units = round(res.units_bought, 6).normalize(),
        current = format_price(res.current_price),
        mcap = format_mcap(market_cap),
        risk = risk_line(risk),
        value = format_usd(res.current_value),
        multiple = round(res.multiple, 2),
        profit = format_usd(res.profit_abs),
        pct = format_pct(res.profit_pct),
    )
}

pub fn position_added(pos: &Position) -> String {
    format!(
        "Saved: {} `{}` @ {}\nUse `/portfolio` to view PnL.",
        format_amount(pos.amount),
        pos.symbol,
        format_price(pos.buy_price),
    )
}

pub fn empty_portfolio() -> String {
    "You have no positions yet.\nAdd one with `/addpos SYMBOL AMOUNT BUY_PRICE`.".into()
}

pub fn portfolio(summary: &PortfolioSummary) -> String {
    let mut out = format!(
        "{} *Portfolio Summary*\n\n\
         • Initial: `{}`\n\
         • Current: `{}`\n\
         • PnL: `{}` ({})\n\n\
         *Positions:*\n\n",
        pnl_emoji(summary.total_pnl_abs),
        format_usd(summary.total_cost),
        format_usd(summary.total_value),
        format_usd(summary.total_pnl_abs),
        format_pct(summary.total_pnl_pct),
    );

    let lines: Vec<String> = summary
        .per_position
        .iter()
        .enumerate()
        .map(|(idx, v)| {
            let pos = &v.position;
            match &v.pnl {
                Ok(pnl) => format!(
                    "{}. {} `{}`\n   • Amount: `{}`\n   • Buy price: `{}`\n   • Current price: `{}`\n   • Value: `{}`\n   • PnL: `{}` ({})",
                    idx + 1,
                    pnl_emoji(pnl.pnl_abs),
                    pos.symbol,
                    format_amount(pos.amount),
                    format_price(pos.buy_price),
                    format_price(pnl.current_price),
                    format_usd(pnl.current_value),
                    format_usd(pnl.pnl_abs),
                    format_pct(pnl.pnl_pct),
                ),
                Err(e) => format!(
                    "{}. ❔ `{}`\n   • Amount: `{}`\n   • Buy price: `{}`\n   • {}",
                    idx + 1,
                    pos.symbol,
                    format_amount(pos.amount),
                    format_price(pos.buy_price),
                    e.user_message(),
                ),
            }
        })
        .collect();
    out.push_str(&lines.join("\n\n"));

    let unpriced = summary.unpriced();
    if unpriced > 0 {
        out.push_str(&format!(
            "\n\n_{unpriced} position(s) could not be valued and are excluded from the totals._"
        ));
    }
    out
}

pub fn removed(symbol: &str, count: u64) -> String {
    if count == 0 {
        format!("No `{symbol}` positions found in your portfolio.")
    } else {
        format!("🗑️ Removed all `{symbol}` positions from your portfolio.")
    }
}

pub fn cleared(count: u64) -> String {
    if count == 0 {
        "You don't have any saved positions yet.".into()
    } else {
        "🗑️ Your entire portfolio has been cleared.".into()
    }
}

pub fn ath(report: &AthReport) -> String {
    let mut text = format!(
        "📈 *All-Time High for {} ({})*\n\n\
         • ATH price: `{}`\n\
         • ATH date: `{}`\n\
         • Current price: `{}`\n\
         • Market cap: `{}`\n\
         • Degen score: `{}` of ATH retained\n",
        escape_in_bold(&report.name),
        escape_in_bold(&report.symbol),
        format_price(report.ath_price),
        report.ath_date,
        format_price(report.current_price),
        format_mcap(report.market_cap),
        format_pct(report.degen_score),
    );

    if report.change_from_ath_pct < Decimal::ZERO {
        text.push_str(&format!(
            "• Currently `{}` below ATH\n",
            format_pct(-report.change_from_ath_pct)
        ));
    } else if report.change_from_ath_pct > Decimal::ZERO {
        text.push_str(&format!(
            "• Currently `{}` ABOVE ATH 🤯\n",
            format_pct(report.change_from_ath_pct)
        ));
    }
    text.push_str(&risk_line(report.risk));
    text
}

const GM_MESSAGES: [&str; 4] = [
    "gm anon ☀️",
    "gm, may your bags be green today 🟢",
    "gm, remember: time in the market > timing the market.",
    "gm, stay hydrated and avoid 50x leverage.",
];

/// Pick a greeting; `seed` is usually the Telegram update id.
pub fn gm(seed: i64) -> String {
    GM_MESSAGES[seed.rem_euclid(GM_MESSAGES.len() as i64) as usize].to_string()
}
