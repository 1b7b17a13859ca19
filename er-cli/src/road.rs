//! Road closure arguments shared by subcommands.
use anyhow::Result;
use er_route::RoadNetwork;
use tracing::info;

/// Parse a `FROM:TO` road reference.
pub fn parse_road(s: &str) -> Result<(String, String), String> {
    match s.split_once(':') {
        Some((from, to)) if !from.is_empty() && !to.is_empty() && !to.contains(':') => {
            Ok((from.to_string(), to.to_string()))
        },
        _ => Err(format!("'{s}' is not a road; expected FROM:TO")),
    }
}

/// Close every listed road, then up to `fire` fire-risk roads. Unknown roads are an error.
pub fn apply_closures(network: &mut RoadNetwork, close: &[(String, String)], fire: usize) -> Result<()> {
    for (from, to) in close {
        network.set_edge_state(from, to, true)?;
    }
    if fire > 0 {
        let closed = network.close_fire_risk_roads(fire);
        info!("closed {} fire-risk roads", closed.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use er_route::testutils::lahaina;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("C:D", Some(("C", "D")))]
    #[case("Front:Papalaua", Some(("Front", "Papalaua")))]
    #[case("CD", None)]
    #[case(":D", None)]
    #[case("C:", None)]
    #[case("A:B:C", None)]
    fn test_parse_road(#[case] input: &str, #[case] expected: Option<(&str, &str)>) {
        let expected = expected.map(|(from, to)| (from.to_string(), to.to_string()));
        assert_eq!(parse_road(input).ok(), expected);
    }

    #[rstest]
    fn test_apply_closures(mut lahaina: RoadNetwork) {
        apply_closures(&mut lahaina, &[("A".into(), "B".into())], 1).unwrap();

        let closed = lahaina.closed_roads();
        assert_eq!(closed.len(), 2);
        assert_contains!(closed, &("A".to_string(), "B".to_string()));
    }

    #[rstest]
    fn test_apply_closures_unknown_road(mut lahaina: RoadNetwork) {
        assert_err!(apply_closures(&mut lahaina, &[("A".into(), "F".into())], 0));
    }
}
