//! Snapshot tests
//!
//! Loads each *.yaml file in /tests/ individually, resolves its references
//! and compares if the written document changes.

#[test]
fn snapshots() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("AUTOCONFIG_LOG"))
        .with_writer(std::io::stderr)
        .init();

    insta::glob!("*.yaml", |path| {
        let mut node = autoconfig::ConfigNode::from_path(path, &Default::default())
            .expect("must be a valid document");

        autoconfig::reuse::Resolver::default()
            .verbose(false)
            .resolve_in_place(&mut node);

        let rendered = node.to_yaml_string();
        insta::assert_snapshot!(rendered);
    });
}
