use lang_radar::api::RepositoryRef;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Repo {
    pub name: String,
    pub languages_url: String,
    #[serde(default)]
    pub fork: bool,
}

impl From<Repo> for RepositoryRef {
    fn from(repo: Repo) -> Self {
        RepositoryRef::new(repo.name, repo.languages_url, repo.fork)
    }
}

#[derive(Deserialize, Debug)]
pub struct ErrorBody {
    pub message: String,
}

#[test]
fn repo_payload_test() -> anyhow::Result<()> {
    let body = r#"[
        {"id": 1, "name": "hello", "languages_url": "https://api.github.com/repos/octocat/hello/languages", "fork": false, "stargazers_count": 3},
        {"id": 2, "name": "forked", "languages_url": "https://api.github.com/repos/octocat/forked/languages", "fork": true}
    ]"#;
    let repos: Vec<Repo> = serde_json::from_str(body)?;
    let repos: Vec<RepositoryRef> = repos.into_iter().map(RepositoryRef::from).collect();
    assert_eq!(repos[0].name, "hello");
    assert!(!repos[0].fork);
    assert!(repos[1].fork);
    assert_eq!(repos[1].languages_url, "https://api.github.com/repos/octocat/forked/languages");
    Ok(())
}
