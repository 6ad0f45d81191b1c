//! Parsing of `SEED[:TOP_N]` command-line specs into validated requests.

use anyhow::Context;

use tagpulse_core::SeedRequest;

/// Turns raw seed specs into [`SeedRequest`]s.
///
/// `travel:3` asks for 3 suggestions; bare `travel` uses `default_top_n`.
///
/// # Errors
///
/// Fails on an unparseable top-n, a top-n outside `1..=10`, or an empty tag,
/// naming the offending spec.
pub fn parse_seeds(specs: &[String], default_top_n: usize) -> anyhow::Result<Vec<SeedRequest>> {
    specs
        .iter()
        .map(|spec| {
            let (tag, top_n) = match spec.rsplit_once(':') {
                Some((tag, n)) => {
                    let n: usize = n
                        .parse()
                        .with_context(|| format!("seed \"{spec}\": top-n is not a number"))?;
                    (tag, n)
                }
                None => (spec.as_str(), default_top_n),
            };
            SeedRequest::new(tag, top_n).with_context(|| format!("seed \"{spec}\""))
        })
        .collect()
}
