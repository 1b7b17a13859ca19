use std::path::PathBuf;

use anyhow::Result;
use er_route::config::load_network;
use er_route::{
    HierarchicalQuery,
    HierarchyRoute,
    NetworkSnapshot,
    Route,
    RoutingError,
    Shortcut,
    Tier,
};
use serde::Serialize;
use tracing::{
    info,
    warn,
};

use crate::road::{
    apply_closures,
    parse_road,
};

#[derive(clap::Args)]
pub struct Args {
    #[arg(short, long, help = "network definition (YAML or JSON)")]
    pub network: PathBuf,

    #[arg(long, help = "start node id")]
    pub from: String,

    #[arg(long, help = "destination node id")]
    pub to: String,

    #[arg(long, value_parser = parse_road, help = "close a road before routing (FROM:TO, repeatable)")]
    pub close: Vec<(String, String)>,

    #[arg(long, default_value_t = 0, help = "close up to N fire-risk roads before routing")]
    pub fire: usize,

    #[arg(long, help = "print the report as JSON")]
    pub json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteReport {
    closed_roads: Vec<(String, String)>,
    shortest_path: Route,
    hierarchy: HierarchyRoute,
    invalidated_shortcuts: Vec<Shortcut>,
}

pub fn cmd(args: &Args) -> Result<()> {
    let mut network = load_network(&args.network)?;
    apply_closures(&mut network, &args.close, args.fire)?;

    let report = build_report(&network.snapshot(), &args.from, &args.to, network.closed_roads())?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Run both engines on one snapshot. A hierarchy miss falls back to the full engine explicitly.
fn build_report(
    snapshot: &NetworkSnapshot,
    from: &str,
    to: &str,
    closed_roads: Vec<(String, String)>,
) -> Result<RouteReport> {
    let shortest_path = er_route::search::shortest_path(snapshot, from, to)?;
    let engine = HierarchicalQuery::new(snapshot);

    let hierarchy = match engine.query(from, to) {
        Ok(route) => route,
        Err(RoutingError::NoPathFound { .. }) => {
            warn!("hierarchy query failed, falling back to full search");
            HierarchyRoute {
                expanded_path: shortest_path.path.clone(),
                route: shortest_path.clone(),
                tier: Tier::Fallback,
                shortcuts_used: vec![],
            }
        },
        Err(err) => return Err(err.into()),
    };
    info!(tier = %hierarchy.tier, cost = %hierarchy.route.cost, "route computed");

    Ok(RouteReport {
        closed_roads,
        shortest_path,
        hierarchy,
        invalidated_shortcuts: engine.invalidated_shortcuts().into_iter().cloned().collect(),
    })
}

fn print_report(report: &RouteReport) {
    if !report.closed_roads.is_empty() {
        let closed: Vec<String> = report.closed_roads.iter().map(|(from, to)| format!("{from}->{to}")).collect();
        println!("closed roads:     {}", closed.join(", "));
    }

    let full = &report.shortest_path;
    println!("dijkstra:         cost {}, path {}, {} nodes visited", full.cost, full.path.join(" -> "), full.nodes_visited);

    let hier = &report.hierarchy;
    println!(
        "hierarchy ({}): cost {}, path {}, {} nodes visited",
        hier.tier,
        hier.route.cost,
        hier.route.path.join(" -> "),
        hier.route.nodes_visited
    );
    println!("expanded path:    {}", hier.expanded_path.join(" -> "));

    for shortcut in &report.invalidated_shortcuts {
        println!("invalidated:      {} -> {} via {}", shortcut.from, shortcut.to, shortcut.via.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use er_route::testutils::{
        lahaina,
        six_node_chain,
    };
    use er_route::RoadNetwork;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_build_report_open(lahaina: RoadNetwork) {
        let report = build_report(&lahaina.snapshot(), "A", "F", vec![]).unwrap();

        assert_eq!(report.shortest_path.cost.into_inner(), 460.0);
        assert_eq!(report.hierarchy.route.cost.into_inner(), 440.0);
        assert_eq!(report.hierarchy.tier, Tier::Shortcut);
        assert!(report.invalidated_shortcuts.is_empty());
    }

    #[rstest]
    fn test_build_report_compares_exploration(lahaina: RoadNetwork) {
        let report = build_report(&lahaina.snapshot(), "A", "D", vec![]).unwrap();

        assert_eq!(report.shortest_path.nodes_visited, 14);
        assert_eq!(report.hierarchy.route.nodes_visited, 13);
        assert_eq!(report.hierarchy.expanded_path, report.shortest_path.path);
    }

    #[rstest]
    fn test_build_report_fire(mut lahaina: RoadNetwork) {
        apply_closures(&mut lahaina, &[], 3).unwrap();
        let report = build_report(&lahaina.snapshot(), "A", "F", lahaina.closed_roads()).unwrap();

        assert_eq!(report.shortest_path.cost.into_inner(), 485.0);
        assert_eq!(report.hierarchy.route.cost.into_inner(), 475.0);
        assert_eq!(report.invalidated_shortcuts.len(), 2);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["hierarchy"]["tier"], "shortcut");
        assert_eq!(json["closedRoads"].as_array().unwrap().len(), 3);
    }

    #[rstest]
    fn test_build_report_unreachable(mut six_node_chain: RoadNetwork) {
        six_node_chain.close_edge("C", "D");
        let err = build_report(&six_node_chain.snapshot(), "A", "F", vec![]).unwrap_err();

        assert!(matches!(err.downcast_ref::<RoutingError>(), Some(RoutingError::NoPathFound { .. })));
    }
}
