use crate::models::case_study::{CaseCategory, CaseLogic, CaseStudy, Difficulty};
use crate::models::trade::TradeDirection;

/// Built-in worked examples for the learning center, read-only.
pub struct CaseLibrary;

impl CaseLibrary {
    pub fn all() -> &'static [CaseStudy] {
        CASES
    }

    pub fn by_category(category: CaseCategory) -> Vec<&'static CaseStudy> {
        CASES.iter().filter(|c| c.category == category).collect()
    }

    pub fn find(id: &str) -> Option<&'static CaseStudy> {
        CASES.iter().find(|c| c.id == id)
    }

    /// Cases carrying `tag` (exact match).
    pub fn with_tag(tag: &str) -> Vec<&'static CaseStudy> {
        CASES.iter().filter(|c| c.tags.contains(&tag)).collect()
    }
}

static CASES: &[CaseStudy] = &[
    // Trend following
    CaseStudy {
        id: "case_01",
        category: CaseCategory::Trend,
        title: "Rebar - MA60 trend pullback",
        direction: TradeDirection::Long,
        difficulty: Difficulty::Basic,
        tags: &["MA60", "Pinbar", "Granville"],
        description: "The core model: in a strong daily trend, wait for a deep hourly pullback \
                      and enter on a confirmed signal at the key moving average.",
        psychology: "Large buyers built the daily trend. When profit-taking drags price back to \
                     their average cost (MA60) they defend it, printing a pinbar.",
        logic: CaseLogic {
            d1: "Daily MA60 slopes up around 45 degrees; price holds above MA20 and pulls back on light volume after a new high.",
            h1: "Pullback reaches the prior breakout point, which coincides with the hourly MA60: a double support.",
            signal: "Sharp drop into support followed by a long-tailed pinbar on rising volume.",
            trigger: "5-minute box forms after the pinbar; entry on the break of the box high.",
            execution: "Stop below the pinbar low. First target the prior high.",
        },
        key_takeaway: "Trade with the big trend, against the small one. Daily must be strong and the hourly pullback must reach a real level.",
    },
    CaseStudy {
        id: "case_04",
        category: CaseCategory::Trend,
        title: "Methanol - breakout and retest (role reversal)",
        direction: TradeDirection::Long,
        difficulty: Difficulty::Advanced,
        tags: &["Role reversal", "N structure", "Breakout retest"],
        description: "Price breaks the top of a multi-week range, then drifts back on light volume \
                      to test it. Old resistance becomes support.",
        psychology: "The breakout stops out the shorts and hands control to buyers. The retest \
                     checks the breakout and lets sidelined money in.",
        logic: CaseLogic {
            d1: "Ascending triangle; a wide bull candle clears the 2500 ceiling that held for 20 days.",
            h1: "Price grinds back to the 2500 round number, now acting as a floor.",
            signal: "Morning star or bullish engulfing near 2500.",
            trigger: "5-minute falling wedge breaks its upper line on volume.",
            execution: "Stop at 2490 below the level; ride the main leg.",
        },
        key_takeaway: "Skip the first breakout; take the retest. Role reversal is the most reliable price action.",
    },
    // Reversal
    CaseStudy {
        id: "case_02",
        category: CaseCategory::Reversal,
        title: "PTA - retest of a broken trendline (2B rule)",
        direction: TradeDirection::Short,
        difficulty: Difficulty::Advanced,
        tags: &["Trendline break", "2B rule", "Retest"],
        description: "After a long uptrend breaks, price usually retests the underside of the \
                      trendline before falling. That retest is the short.",
        psychology: "Stubborn longs buy the dip and push price up, but buying dries up at the \
                     old trendline and the last longs get trapped.",
        logic: CaseLogic {
            d1: "Price closes below a three-month rising trendline; MA20 turns down through MA60.",
            h1: "Bounce after the first leg down tags the underside of the old trendline.",
            signal: "Large bearish engulfing candle swallowing three small bull bars.",
            trigger: "5-minute bearish N structure breaks its neckline.",
            execution: "Stop above the engulfing high. Size the position and enter.",
        },
        key_takeaway: "The first retest after a trendline break has a very high hit rate; dip buyers become fuel for the shorts.",
    },
    CaseStudy {
        id: "case_05",
        category: CaseCategory::Reversal,
        title: "Palm oil - double top at daily resistance",
        direction: TradeDirection::Short,
        difficulty: Difficulty::Basic,
        tags: &["Double top", "Divergence", "Neckline break"],
        description: "Two failed attempts at a historic high form an M top; the failed second push \
                      shows exhausted momentum.",
        psychology: "The first push is momentum, the second is a bull trap. No new high and a fast \
                     drop mean buying is spent and supply is being distributed.",
        logic: CaseLogic {
            d1: "Price hits yearly resistance with clear RSI bearish divergence.",
            h1: "Textbook double top; right peak lower than the left on shrinking volume.",
            signal: "Wide bear candle closes through the neckline.",
            trigger: "5-minute lower high on the neckline retest, then acceleration down.",
            execution: "Stop above the right peak. Target one measured move.",
        },
        key_takeaway: "Patterns count only at higher-timeframe resistance; an hourly double top without it is often just a pause.",
    },
    // Traps
    CaseStudy {
        id: "case_03",
        category: CaseCategory::Trap,
        title: "Trap - false breakout in a range",
        direction: TradeDirection::Long,
        difficulty: Difficulty::Basic,
        tags: &["Tangled MAs", "Narrow range", "Chop"],
        description: "A signal that looks fine but ignores the first condition: the environment.",
        psychology: "No side has control. Breakouts are stop runs that snap back to the mean.",
        logic: CaseLogic {
            d1: "Fatal error: MA60 is flat, price whipsaws through it, and the swing structure is a mess.",
            h1: "Price is at a so-called support that means little without a higher-timeframe direction.",
            signal: "A pinbar that tempts the entry.",
            trigger: "Chasing the move.",
            execution: "Price reverses straight through the stop. No trend trades in a range.",
        },
        key_takeaway: "Without a daily trend every hourly signal is noise. Sitting out a range is a winning trade.",
    },
];
