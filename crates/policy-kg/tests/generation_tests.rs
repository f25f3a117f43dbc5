//! End-to-end graph generation tests.
//!
//! These tests run realistic policy SQL and code dictionaries through the
//! generator and inspect the exported graph.

use std::fs;

use policy_codes::{CodeDictionary, CodeError, CodeIndex};
use policy_kg::graph::relation;
use policy_kg::persistence::load_graph;
use policy_kg::{
    generate_from_paths, GeneratorConfig, GraphStore, KgError, KnowledgeGraph,
    KnowledgeGraphGenerator, NodeType,
};

const BARIATRIC_SQL: &str = "\
-- Bariatric surgery eligibility
SELECT patient_id
FROM patients
WHERE patient_age >= 18
  AND (patient_bmi >= 40 OR (patient_bmi >= 35 AND comorbidity_flag = 1));
";

const CODES_JSON: &str = r#"{
    "CPT": {"43644": "Laparoscopic gastric bypass"},
    "ICD10_Diagnosis": {"E08-E13": "Diabetes mellitus", "E66.01": "Morbid obesity"}
}"#;

fn index() -> CodeIndex {
    CodeIndex::new(&CodeDictionary::from_json_str(CODES_JSON).unwrap())
}

fn child_ids<'a>(graph: &'a KnowledgeGraph, id: &'a str, rel: &'a str) -> Vec<&'a str> {
    graph.children(id, rel).map(|n| n.id.as_str()).collect()
}

#[test]
fn test_bariatric_structure() {
    let codes = index();
    let output = KnowledgeGraphGenerator::new(&codes)
        .generate("bariatric", BARIATRIC_SQL)
        .unwrap();
    let graph = &output.graph;

    assert_eq!(output.stats.group_count, 3);
    assert_eq!(output.stats.condition_count, 4);
    assert_eq!(output.stats.code_count, 0);
    assert_eq!(output.stats.node_count, 8);
    assert_eq!(output.stats.edge_count, 7);

    assert_eq!(
        child_ids(graph, "query_bariatric", relation::LOGIC),
        vec!["group_and_001"]
    );
    assert_eq!(
        child_ids(graph, "group_and_001", relation::LOGIC),
        vec!["condition_001", "group_or_002"]
    );
    assert_eq!(
        child_ids(graph, "group_or_002", relation::LOGIC),
        vec!["condition_002", "group_and_003"]
    );
    assert_eq!(
        child_ids(graph, "group_and_003", relation::LOGIC),
        vec!["condition_003", "condition_004"]
    );

    let labels: Vec<&str> = graph
        .nodes_of_type(NodeType::Condition)
        .map(|n| n.label.as_str())
        .collect();
    assert_eq!(
        labels,
        vec![
            "patient_age >= 18",
            "patient_bmi >= 40",
            "patient_bmi >= 35",
            "comorbidity_flag = 1"
        ]
    );
}

#[test]
fn test_logic_edges_carry_parent_operator() {
    let codes = index();
    let graph = KnowledgeGraphGenerator::new(&codes)
        .generate("bariatric", BARIATRIC_SQL)
        .unwrap()
        .graph;

    let op = |s: &str, t: &str| {
        graph
            .edge(s, t)
            .and_then(|e| e.attribute("logical_operator"))
            .map(str::to_string)
    };
    assert_eq!(op("query_bariatric", "group_and_001").as_deref(), Some("ROOT"));
    assert_eq!(op("group_and_001", "group_or_002").as_deref(), Some("AND"));
    assert_eq!(op("group_or_002", "condition_002").as_deref(), Some("OR"));
    assert_eq!(op("group_and_003", "condition_004").as_deref(), Some("AND"));
}

#[test]
fn test_unknown_literal_creates_no_code() {
    let dictionary =
        CodeDictionary::from_json_str(r#"{"CPT": {"43644": "Gastric bypass"}}"#).unwrap();
    let codes = CodeIndex::new(&dictionary);
    let graph = KnowledgeGraphGenerator::new(&codes)
        .generate("p", "WHERE procedure_code IN ('43644','99999')")
        .unwrap()
        .graph;

    let code_nodes: Vec<_> = graph.nodes_of_type(NodeType::Code).collect();
    assert_eq!(code_nodes.len(), 1);
    assert_eq!(code_nodes[0].attribute("code"), Some("43644"));
    assert_eq!(code_nodes[0].attribute("description"), Some("Gastric bypass"));
    assert_eq!(code_nodes[0].label, "CPT: 43644");

    let referrers: Vec<_> = graph
        .edges
        .iter()
        .filter(|e| e.relation == relation::REFERENCES)
        .collect();
    assert_eq!(referrers.len(), 1);
    assert_eq!(referrers[0].source, "condition_001");
    assert_eq!(referrers[0].target, "code_CPT_43644");
    assert_eq!(referrers[0].attribute("code_type"), Some("CPT"));
}

#[test]
fn test_range_codes() {
    let codes = index();
    let graph = KnowledgeGraphGenerator::new(&codes)
        .generate(
            "diabetes",
            "WHERE dx IN ('E08', 'e10', 'E13', 'E14', 'D10', 'E66.01')",
        )
        .unwrap()
        .graph;

    let mut ids: Vec<&str> = graph
        .nodes_of_type(NodeType::Code)
        .map(|n| n.id.as_str())
        .collect();
    ids.sort_unstable();
    assert_eq!(
        ids,
        vec![
            "code_ICD10_Diagnosis_E08",
            "code_ICD10_Diagnosis_E10",
            "code_ICD10_Diagnosis_E13",
            "code_ICD10_Diagnosis_E66.01",
        ]
    );

    let e10 = graph.node("code_ICD10_Diagnosis_E10").unwrap();
    assert_eq!(e10.attribute("source_key"), Some("E08-E13"));
    assert_eq!(e10.attribute("description"), Some("Diabetes mellitus"));

    let exact = graph.node("code_ICD10_Diagnosis_E66.01").unwrap();
    assert_eq!(exact.attribute("source_key"), Some("E66.01"));
}

#[test]
fn test_missing_where_is_empty_graph() {
    let codes = index();
    let output = KnowledgeGraphGenerator::new(&codes)
        .generate("p", "SELECT * FROM patients;")
        .unwrap();
    assert!(output.graph.is_empty());
    assert_eq!(output.stats.node_count, 0);
}

#[test]
fn test_empty_paren_operand_creates_no_condition() {
    let codes = index();
    let graph = KnowledgeGraphGenerator::new(&codes)
        .generate("p", "WHERE a = 1 AND ()")
        .unwrap()
        .graph;

    let labels: Vec<&str> = graph
        .nodes_of_type(NodeType::Condition)
        .map(|n| n.label.as_str())
        .collect();
    assert_eq!(labels, vec!["a = 1"]);
    assert_eq!(graph.nodes_of_type(NodeType::LogicalOperator).count(), 0);
    assert!(graph.edge("query_p", "condition_001").is_some());
}

#[test]
fn test_malformed_parens_become_single_leaf() {
    let codes = index();
    let graph = KnowledgeGraphGenerator::new(&codes)
        .generate("p", "WHERE (a = 1 AND (b = 2)")
        .unwrap()
        .graph;
    assert_eq!(graph.nodes_of_type(NodeType::LogicalOperator).count(), 0);
    assert_eq!(graph.nodes_of_type(NodeType::Condition).count(), 1);
}

#[test]
fn test_generate_from_file_and_save_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let sql_path = dir.path().join("bariatric.sql");
    let dict_path = dir.path().join("codes.json");
    fs::write(
        &sql_path,
        "SELECT * FROM p WHERE patient_bmi >= 40 AND diagnosis_code IN ('E11', 'E66.01');",
    )
    .unwrap();
    fs::write(&dict_path, CODES_JSON).unwrap();

    let output = generate_from_paths(&sql_path, &dict_path, GeneratorConfig::default()).unwrap();
    let root = output.graph.node("query_bariatric").unwrap();
    assert_eq!(root.node_type, NodeType::Query);
    let file = root.attribute("file").unwrap();
    assert!(file.ends_with("bariatric.sql"));
    assert!(std::path::Path::new(file).is_absolute());
    assert_eq!(output.stats.code_count, 2);

    let codes = index();
    let generator = KnowledgeGraphGenerator::new(&codes);
    let files = generator.save(&output).unwrap();
    assert_eq!(
        files.nodes.file_name().unwrap().to_str(),
        Some("kg_nodes.json")
    );
    assert_eq!(
        files.nodes.parent().unwrap().canonicalize().unwrap(),
        dir.path().canonicalize().unwrap()
    );

    let loaded = load_graph(&files.nodes, &files.edges).unwrap();
    assert_eq!(loaded, output.graph);

    let rebuilt = GraphStore::from_graph(loaded).into_graph();
    assert_eq!(rebuilt, output.graph);
}

#[test]
fn test_save_to_configured_dir() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("graphs");
    let codes = index();
    let config = GeneratorConfig::builder()
        .with_output_dir(&out)
        .with_nodes_filename("nodes.json")
        .with_edges_filename("edges.json")
        .build();
    let generator = KnowledgeGraphGenerator::with_config(&codes, config);

    let output = generator.generate("p", "WHERE a = 1").unwrap();
    let files = generator.save(&output).unwrap();
    assert_eq!(files.nodes, out.join("nodes.json"));
    assert_eq!(files.edges, out.join("edges.json"));

    let edges: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&files.edges).unwrap()).unwrap();
    assert_eq!(
        edges,
        serde_json::json!([{
            "source": "query_p",
            "target": "condition_001",
            "relation": "logic",
            "logical_operator": "ROOT"
        }])
    );
}

#[test]
fn test_missing_sql_file() {
    let codes = index();
    let dir = tempfile::tempdir().unwrap();
    let err = KnowledgeGraphGenerator::new(&codes)
        .generate_from_file(dir.path().join("absent.sql"))
        .unwrap_err();
    assert!(matches!(err, KgError::SqlFileNotFound(_)));
}

#[test]
fn test_missing_dictionary_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let sql_path = dir.path().join("p.sql");
    fs::write(&sql_path, "WHERE a = 1").unwrap();

    let err = generate_from_paths(
        &sql_path,
        dir.path().join("missing.json"),
        GeneratorConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        KgError::Codes(CodeError::DictionaryNotFound(_))
    ));
}
