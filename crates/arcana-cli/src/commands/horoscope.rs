//! `arcana horoscope <sign> [--period ...]`.

use anyhow::Result;
use arcana_application::AppContext;
use arcana_core::horoscope::{Period, ZodiacSign};
use colored::Colorize;

/// Prints the horoscope of `sign` for each period in turn.
///
/// Several periods in one call behave like switching tabs: they keep the
/// language of the first answer.
pub async fn show(ctx: &AppContext, sign: ZodiacSign, periods: &[Period]) -> Result<()> {
    let default_period = [Period::default()];
    let periods = if periods.is_empty() {
        &default_period[..]
    } else {
        periods
    };

    for period in periods {
        let horoscope = ctx.horoscope.select(sign, *period).await?;
        println!(
            "{}",
            format!("{} {sign} · {period}", sign.symbol()).bright_magenta().bold()
        );
        println!("{}", horoscope.text);
        println!();
    }
    Ok(())
}
