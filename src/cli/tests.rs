use super::*;
use crate::cli::common::{BranchArgs, OutputFormat};
use crate::reactor::Reactor;
use crate::test_utils::{modulo_three_reactor, publish_modulo_three_artifacts};
use tempfile::TempDir;

fn isolated_config(temp: &TempDir) -> CliConfig {
    CliConfig {
        log_level: None,
        config_path: Some(temp.path().join("absent-config.toml")),
        no_color: true,
    }
}

#[test]
fn test_build_config_log_levels() {
    let cli = Cli::try_parse_from(["pombranch", "tag", "main"]).unwrap();
    assert_eq!(cli.build_config().log_level, Some("info".to_string()));

    let cli = Cli::try_parse_from(["pombranch", "--verbose", "tag", "main"]).unwrap();
    assert_eq!(cli.build_config().log_level, Some("debug".to_string()));

    let cli = Cli::try_parse_from(["pombranch", "tag", "main", "--quiet"]).unwrap();
    assert_eq!(cli.build_config().log_level, None);

    let cli = Cli::try_parse_from(["pombranch", "--config", "/custom/path.toml", "tag", "main"])
        .unwrap();
    assert_eq!(cli.build_config().config_path, Some(PathBuf::from("/custom/path.toml")));
}

#[test]
fn test_plan_arguments() {
    let cli = Cli::try_parse_from([
        "pombranch",
        "plan",
        "--reactor",
        "reactor.json",
        "--branch",
        "feature/ABC-1",
        "--repository",
        "https://a.example/maven",
        "--repository",
        "https://b.example/maven",
        "--max-parallel",
        "3",
        "--format",
        "json",
    ])
    .unwrap();

    let Commands::Plan(cmd) = cli.command else {
        panic!("expected the plan command");
    };
    assert_eq!(cmd.args.reactor, PathBuf::from("reactor.json"));
    assert_eq!(cmd.args.repositories.len(), 2);
    assert_eq!(cmd.args.max_parallel, Some(3));
    assert_eq!(cmd.args.format, OutputFormat::Json);
    assert!(!cmd.args.prepend);

    // The last of --prepend and --no-prepend wins.
    let cli = Cli::try_parse_from([
        "pombranch", "apply", "-r", "r.json", "-b", "x", "--prepend", "--no-prepend",
    ])
    .unwrap();
    let Commands::Apply(cmd) = cli.command else {
        panic!("expected the apply command");
    };
    assert!(!cmd.args.prepend);
    assert!(cmd.args.no_prepend);

    // The reactor and the branch are required.
    assert!(Cli::try_parse_from(["pombranch", "plan", "--branch", "x"]).is_err());
    assert!(Cli::try_parse_from(["pombranch", "apply", "--reactor", "r.json"]).is_err());
}

fn branch_args(reactor: &std::path::Path) -> BranchArgs {
    BranchArgs {
        reactor: reactor.to_path_buf(),
        branch: "feature/ABC-1".to_string(),
        prepend: false,
        no_prepend: false,
        repositories: vec![],
        local_repository: None,
        max_parallel: None,
        format: OutputFormat::Text,
    }
}

#[test]
fn test_flags_override_config() {
    let mut config = BranchConfig {
        local_repository: Some("/from/config".to_string()),
        max_parallel: Some(2),
        ..BranchConfig::default()
    };
    config.add_repository("central", "https://central.example/maven");

    let mut args = branch_args(std::path::Path::new("r.json"));
    args.prepend = true;
    args.repositories = vec!["https://extra.example/maven".to_string()];
    args.local_repository = Some(PathBuf::from("/from/flag"));
    args.max_parallel = Some(7);

    let merged = args.merge_into(config).unwrap();
    assert!(merged.prepend);
    assert_eq!(merged.local_repository.as_deref(), Some("/from/flag"));
    assert_eq!(merged.max_parallel(), 7);
    assert_eq!(merged.repositories.len(), 1);
    assert_eq!(merged.extra_repositories, ["https://extra.example/maven"]);

    let prepending = BranchConfig {
        prepend: true,
        ..BranchConfig::default()
    };
    let mut args = branch_args(std::path::Path::new("r.json"));
    assert!(args.merge_into(prepending.clone()).unwrap().prepend);
    args.no_prepend = true;
    assert!(!args.merge_into(prepending).unwrap().prepend);

    let mut args = branch_args(std::path::Path::new("r.json"));
    args.max_parallel = Some(0);
    assert!(args.merge_into(BranchConfig::default()).is_err());
}

#[tokio::test]
async fn test_tag_command() {
    let temp = TempDir::new().unwrap();

    let cli = Cli::try_parse_from(["pombranch", "tag", "feature/ABC-123-login"]).unwrap();
    cli.execute_with_config(isolated_config(&temp)).await.unwrap();

    let cli = Cli::try_parse_from(["pombranch", "tag", "release/"]).unwrap();
    let error = cli.execute_with_config(isolated_config(&temp)).await.unwrap_err();
    assert!(error.to_string().contains("does not yield a usable tag"));
}

#[tokio::test]
async fn test_plan_requires_a_repository() {
    let temp = TempDir::new().unwrap();
    let reactor_path = temp.path().join("reactor.json");
    modulo_three_reactor().save(&reactor_path).await.unwrap();

    let cli = Cli::try_parse_from([
        "pombranch",
        "plan",
        "--reactor",
        reactor_path.to_str().unwrap(),
        "--branch",
        "feature/ABC-1",
    ])
    .unwrap();
    let error = cli.execute_with_config(isolated_config(&temp)).await.unwrap_err();
    assert!(error.to_string().contains("no repository configured"));
}

#[tokio::test]
async fn test_apply_rewrites_snapshot() {
    let temp = TempDir::new().unwrap();
    let reactor_path = temp.path().join("reactor.yaml");
    let output_path = temp.path().join("out/reactor.json");
    let repo = temp.path().join("repo");
    modulo_three_reactor().save(&reactor_path).await.unwrap();
    publish_modulo_three_artifacts(&repo, "ABC-1").unwrap();

    let cli = Cli::try_parse_from([
        "pombranch",
        "apply",
        "--reactor",
        reactor_path.to_str().unwrap(),
        "--branch",
        "feature/ABC-1",
        "--local-repository",
        repo.to_str().unwrap(),
        "--output",
        output_path.to_str().unwrap(),
    ])
    .unwrap();
    cli.execute_with_config(isolated_config(&temp)).await.unwrap();

    // The input is untouched when an output file is given.
    assert_eq!(Reactor::load(&reactor_path).await.unwrap(), modulo_three_reactor());

    let rewritten = Reactor::load(&output_path).await.unwrap();
    let root = rewritten.module("branch").unwrap();
    assert_eq!(root.version.as_deref(), Some("1.0-ABC-1-SNAPSHOT"));
    assert_eq!(root.properties["lib1"], "1.0-ABC-1-SNAPSHOT");
    assert_eq!(root.properties["lib2"], "2.0-SNAPSHOT");
    assert_eq!(root.properties["lib3"], "3.0");

    let child = rewritten.module("branch-module").unwrap();
    assert_eq!(child.parent.as_ref().unwrap().version.as_deref(), Some("1.0-ABC-1-SNAPSHOT"));
    assert_eq!(child.profile("module-profile").unwrap().properties["lib22"], "22.0-ABC-1-SNAPSHOT");
    assert_eq!(child.profile("module-profile").unwrap().properties["lib23"], "23.0-SNAPSHOT");
}

#[tokio::test]
async fn test_apply_skipped_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let reactor_path = temp.path().join("reactor.toml");
    let output_path = temp.path().join("out.toml");
    modulo_three_reactor().save(&reactor_path).await.unwrap();

    let cli = Cli::try_parse_from([
        "pombranch",
        "apply",
        "--reactor",
        reactor_path.to_str().unwrap(),
        "--branch",
        "!!!",
        "--local-repository",
        temp.path().to_str().unwrap(),
        "--output",
        output_path.to_str().unwrap(),
    ])
    .unwrap();
    cli.execute_with_config(isolated_config(&temp)).await.unwrap();
    assert!(!output_path.exists());
}
