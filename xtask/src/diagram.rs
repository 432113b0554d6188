//! Architecture diagram of the deployed system, rendered as Graphviz DOT.

use std::fmt::Write as _;

pub struct Node {
    pub id: &'static str,
    pub label: &'static str,
}

pub struct Cluster {
    pub id: &'static str,
    pub label: &'static str,
    pub nodes: Vec<Node>,
    pub children: Vec<Cluster>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum EdgeStyle {
    Solid,
    Dashed,
}

pub struct Edge {
    pub from: &'static str,
    pub to: &'static str,
    pub label: Option<&'static str>,
    pub style: EdgeStyle,
}

pub struct Diagram {
    pub title: &'static str,
    pub nodes: Vec<Node>,
    pub clusters: Vec<Cluster>,
    pub edges: Vec<Edge>,
}

const fn node(id: &'static str, label: &'static str) -> Node {
    Node { id, label }
}

fn edge(from: &'static str, to: &'static str) -> Edge {
    Edge {
        from,
        to,
        label: None,
        style: EdgeStyle::Solid,
    }
}

fn labelled(from: &'static str, to: &'static str, label: &'static str) -> Edge {
    Edge {
        label: Some(label),
        ..edge(from, to)
    }
}

fn dashed(from: &'static str, to: &'static str) -> Edge {
    Edge {
        style: EdgeStyle::Dashed,
        ..edge(from, to)
    }
}

fn leaf_cluster(id: &'static str, label: &'static str, nodes: Vec<Node>) -> Cluster {
    Cluster {
        id,
        label,
        nodes,
        children: Vec::new(),
    }
}

/// Storage, configuration management, training/serving, monitoring,
/// security and optional integrations, wired the way the stack deploys them.
pub fn architecture() -> Diagram {
    let clusters = vec![
        leaf_cluster(
            "infra",
            "Infrastructure Construct",
            vec![node("infra", "Infrastructure Construct")],
        ),
        leaf_cluster(
            "storage",
            "Storage Layer",
            vec![
                node("model_bucket", "Model Artifacts Bucket"),
                node("config_bucket", "Configuration Files Bucket"),
            ],
        ),
        Cluster {
            id: "configuration",
            label: "Configuration Management",
            nodes: vec![node("appconfig", "AWS AppConfig")],
            children: vec![leaf_cluster(
                "appconfig_resources",
                "AppConfig Resources",
                vec![
                    node("config_profiles", "Configuration Profiles"),
                    node("config_environments", "Environments"),
                    node("config_deployments", "Deployments"),
                ],
            )],
        },
        Cluster {
            id: "sagemaker",
            label: "SageMaker Resources",
            nodes: vec![
                node("sm_model", "SageMaker Model"),
                node("sm_endpoint_config", "SageMaker Endpoint Configuration"),
                node("sm_endpoint", "SageMaker Endpoint"),
                node("sm_training", "Training Jobs"),
            ],
            children: vec![leaf_cluster(
                "variants",
                "Model Variants",
                vec![node("sm_variants", "Model Variants")],
            )],
        },
        leaf_cluster(
            "monitoring",
            "Monitoring & Logging",
            vec![
                node("cw_metrics", "CloudWatch Metrics"),
                node("cw_alarms", "CloudWatch Alarms"),
                node("cw_dashboard", "CloudWatch Dashboard"),
                node("sm_monitoring", "SageMaker Model Monitoring"),
                node("cw_logs", "CloudWatch Logs"),
            ],
        ),
        leaf_cluster(
            "security",
            "Security & IAM",
            vec![
                node("iam_roles", "IAM Roles"),
                node("iam_policies", "IAM Policies"),
                node("kms", "KMS Keys"),
            ],
        ),
        leaf_cluster(
            "integrations",
            "Optional Integrations",
            vec![
                node("step_functions", "Step Functions"),
                node("lambda_fns", "Lambda Functions"),
            ],
        ),
    ];

    let mut edges = vec![
        labelled("developer", "infra", "Deploys"),
        edge("appconfig", "config_profiles"),
        edge("appconfig", "config_environments"),
        edge("appconfig", "config_deployments"),
        edge("sm_model", "sm_endpoint_config"),
        edge("sm_endpoint_config", "sm_variants"),
        edge("sm_endpoint_config", "sm_endpoint"),
        edge("sm_endpoint", "cw_metrics"),
        edge("sm_endpoint", "cw_logs"),
        edge("sm_endpoint", "sm_monitoring"),
        edge("cw_metrics", "cw_alarms"),
        edge("cw_metrics", "cw_dashboard"),
        edge("sm_monitoring", "cw_metrics"),
        edge("iam_policies", "iam_roles"),
        labelled("kms", "model_bucket", "Encrypts"),
        labelled("kms", "config_bucket", "Encrypts"),
        dashed("step_functions", "sm_endpoint"),
        dashed("lambda_fns", "sm_endpoint"),
    ];
    edges.extend(
        [
            "model_bucket",
            "config_bucket",
            "appconfig",
            "sm_model",
            "sm_endpoint_config",
            "sm_endpoint",
            "cw_metrics",
            "cw_alarms",
            "cw_dashboard",
            "sm_monitoring",
            "iam_roles",
            "iam_policies",
            "kms",
        ]
        .into_iter()
        .map(|target| edge("infra", target)),
    );
    edges.extend([
        dashed("infra", "step_functions"),
        labelled("model_bucket", "sm_model", "Provides artifacts to"),
        labelled("config_bucket", "appconfig", "Provides configs to"),
        labelled("lambda_fns", "appconfig", "Syncs configs to"),
        labelled("lambda_fns", "sm_training", "Starts"),
        labelled("sm_training", "model_bucket", "Writes versioned output to"),
        labelled("config_deployments", "sm_endpoint", "Updates configs for"),
        labelled("iam_roles", "sm_endpoint", "Grants permissions to"),
        labelled("iam_roles", "appconfig", "Grants permissions to"),
    ]);

    Diagram {
        title: "SageMaker Configuration Infrastructure Architecture",
        nodes: vec![node("developer", "User/Developer")],
        clusters,
        edges,
    }
}

pub fn render_dot(diagram: &Diagram) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "digraph architecture {{");
    let _ = writeln!(
        out,
        "    graph [label={}, labelloc=t, fontsize=20, bgcolor=white, pad=0.5, compound=true];",
        quote(diagram.title)
    );
    let _ = writeln!(out, "    node [shape=box, style=rounded];");
    for node in &diagram.nodes {
        write_node(&mut out, node, 1);
    }
    for cluster in &diagram.clusters {
        write_cluster(&mut out, cluster, 1);
    }
    for edge in &diagram.edges {
        let mut attrs = Vec::new();
        if let Some(label) = edge.label {
            attrs.push(format!("label={}", quote(label)));
        }
        if edge.style == EdgeStyle::Dashed {
            attrs.push("style=dashed".to_string());
        }
        if attrs.is_empty() {
            let _ = writeln!(out, "    {} -> {};", edge.from, edge.to);
        } else {
            let attrs = attrs.join(", ");
            let _ = writeln!(out, "    {} -> {} [{attrs}];", edge.from, edge.to);
        }
    }
    out.push_str("}\n");
    out
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    let indent = "    ".repeat(depth);
    let _ = writeln!(out, "{indent}{} [label={}];", node.id, quote(node.label));
}

fn write_cluster(out: &mut String, cluster: &Cluster, depth: usize) {
    let indent = "    ".repeat(depth);
    let _ = writeln!(out, "{indent}subgraph cluster_{} {{", cluster.id);
    let _ = writeln!(out, "{indent}    label={};", quote(cluster.label));
    for node in &cluster.nodes {
        write_node(out, node, depth + 1);
    }
    for child in &cluster.children {
        write_cluster(out, child, depth + 1);
    }
    let _ = writeln!(out, "{indent}}}");
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}
