// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod get;
mod post;
pub mod server;
mod state;
mod template;
mod view;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::StatusCode;
    use tempfile::TempDir;
    use tokio::net::TcpStream;
    use tokio::spawn;
    use tokio::time::sleep;

    use crate::cmd::add::add_problem;
    use crate::cmd::serve::server::ServeOptions;
    use crate::cmd::serve::server::start_server;
    use crate::collection::Collection;
    use crate::error::Fallible;
    use crate::helper::create_tmp_directory_with_config;
    use crate::store::Backend;
    use crate::store::sqlite::SqliteStore;
    use crate::types::date::Date;
    use crate::types::difficulty::Difficulty;
    use crate::types::problem::NewProblem;
    use crate::types::problem::Problem;
    use crate::types::problem::ProblemId;
    use crate::types::timestamp::Timestamp;

    const CONFIG: &str = "open_browser = false\npoll_interval_ms = 10\n";

    fn open(dir: &TempDir, today: &str) -> Fallible<Collection> {
        Collection::new(
            Some(dir.path().display().to_string()),
            Some(Date::parse(today)?),
        )
    }

    fn seed(dir: &TempDir, name: &str) -> Fallible<Problem> {
        let coll = open(dir, "2024-01-01")?;
        let input = NewProblem::new(name, Some("https://example.com"), Difficulty::Easy, "Arrays", "LeetCode")?;
        add_problem(&coll, input)
    }

    /// Start a server on a free port and wait until it accepts connections.
    async fn serve(dir: &TempDir, today: &str) -> Fallible<String> {
        let coll = open(dir, today)?;
        let port = portpicker::pick_unused_port().unwrap();
        let options = ServeOptions {
            port,
            open_browser: false,
        };
        spawn(async move { start_server(coll, options).await });
        let bind = format!("127.0.0.1:{port}");
        loop {
            if let Ok(stream) = TcpStream::connect(&bind).await {
                drop(stream);
                break;
            }
            sleep(Duration::from_millis(1)).await;
        }
        Ok(format!("http://{bind}"))
    }

    async fn post(url: &str, form: &[(&str, &str)]) -> Fallible<String> {
        let response = reqwest::Client::new()
            .post(url)
            .form(form)
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
        Ok(response.text().await.unwrap())
    }

    async fn get(url: &str) -> String {
        reqwest::get(url).await.unwrap().text().await.unwrap()
    }

    #[tokio::test]
    async fn test_static_routes() -> Fallible<()> {
        let dir = create_tmp_directory_with_config(CONFIG)?;
        let base = serve(&dir, "2024-01-04").await?;

        // Hit the `style.css` endpoint.
        let response = reqwest::get(format!("{base}/style.css")).await.unwrap();
        assert!(response.status().is_success());
        assert_eq!(response.headers().get("content-type").unwrap(), "text/css");

        // Hit the not found endpoint.
        let response = reqwest::get(format!("{base}/herp-derp")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Unknown problem.
        let response = reqwest::get(format!("{base}/problem/404")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Empty dashboard.
        let response = reqwest::get(format!("{base}/")).await.unwrap();
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
        let html = response.text().await.unwrap();
        assert!(html.contains("No problems due today!"));
        assert!(html.contains("No problems found!"));
        Ok(())
    }

    #[tokio::test]
    async fn test_add_and_complete() -> Fallible<()> {
        let dir = create_tmp_directory_with_config(CONFIG)?;
        let seeded = seed(&dir, "Two Sum")?;
        let base = serve(&dir, "2024-01-04").await?;

        let html = get(&format!("{base}/")).await;
        assert!(html.contains("Two Sum"));
        assert!(html.contains("Day 3"));
        assert!(html.contains("Jan 4, 2024 ⏰"));

        let html = post(
            &format!("{base}/add"),
            &[
                ("name", "Valid Anagram"),
                ("link", ""),
                ("difficulty", "Hard"),
                ("category", "Strings"),
                ("platform", ""),
            ],
        )
        .await?;
        assert!(html.contains("Problem added successfully!"));
        assert!(html.contains("Valid Anagram"));

        // The flash is shown once.
        let html = get(&format!("{base}/")).await;
        assert!(!html.contains("Problem added successfully!"));

        let html = post(&format!("{base}/complete/{}", seeded.id), &[]).await?;
        assert!(html.contains("Problem marked as completed!"));
        assert!(html.contains("Jan 4, 2024 ✓"));
        assert!(html.contains("No problems due today!"));

        let html = get(&format!("{base}/problem/{}", seeded.id)).await;
        assert!(html.contains("Last completed: Jan 4, 2024"));
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_add_shows_error() -> Fallible<()> {
        let dir = create_tmp_directory_with_config(CONFIG)?;
        let base = serve(&dir, "2024-01-04").await?;
        let html = post(
            &format!("{base}/add"),
            &[("name", "  "), ("difficulty", "Easy")],
        )
        .await?;
        assert!(html.contains("Please enter a problem name."));
        assert!(html.contains("No problems found!"));

        let html = post(
            &format!("{base}/add"),
            &[
                ("name", "Two Sum"),
                ("link", "javascript:alert(1)"),
                ("difficulty", "Easy"),
            ],
        )
        .await?;
        assert!(html.contains("Please enter a link starting with http:// or https://."));
        assert!(!html.contains("javascript:alert(1)"));
        assert!(html.contains("No problems found!"));
        Ok(())
    }

    #[tokio::test]
    async fn test_due_filter() -> Fallible<()> {
        let dir = create_tmp_directory_with_config(CONFIG)?;
        seed(&dir, "Two Sum")?;
        let base = serve(&dir, "2024-01-04").await?;
        let html = get(&format!("{base}/?category=Graphs&difficulty=")).await;
        assert!(html.contains("No problems due today!"));
        let html = get(&format!("{base}/?category=Arrays&difficulty=Easy")).await;
        assert!(!html.contains("No problems due today!"));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_and_clear() -> Fallible<()> {
        let dir = create_tmp_directory_with_config(CONFIG)?;
        let first = seed(&dir, "Two Sum")?;
        seed(&dir, "Three Sum")?;
        let base = serve(&dir, "2024-01-04").await?;

        let html = get(&format!("{base}/delete/{}", first.id)).await;
        assert!(html.contains("Are you sure you want to delete"));

        let html = post(&format!("{base}/delete/{}", first.id), &[]).await?;
        assert!(html.contains("Problem deleted successfully"));
        assert!(!html.contains("Two Sum"));
        assert!(html.contains("Three Sum"));

        let html = post(&format!("{base}/delete/{}", first.id), &[]).await?;
        assert!(html.contains(&format!("no problem with id {}", first.id)));

        let html = get(&format!("{base}/clear")).await;
        assert!(html.contains("Clear All Problems"));

        let html = post(&format!("{base}/clear"), &[]).await?;
        assert!(html.contains("All problems cleared"));
        assert!(html.contains("No problems found!"));

        let coll = open(&dir, "2024-01-04")?;
        assert!(coll.state()?.problems().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_external_change_is_picked_up() -> Fallible<()> {
        let dir = create_tmp_directory_with_config(CONFIG)?;
        let base = serve(&dir, "2024-01-04").await?;

        // Write through a separate connection, as another process would.
        let db = SqliteStore::open(&dir.path().join("codetracker.db"))?;
        let today = Date::parse("2024-01-04")?;
        let input = NewProblem::new("Word Ladder", None, Difficulty::Hard, "Graphs", "LeetCode")?;
        db.add(&input.into_problem(ProblemId::new("1"), today, Timestamp::now()))?;

        for _ in 0..500 {
            if get(&format!("{base}/")).await.contains("Word Ladder") {
                return Ok(());
            }
            sleep(Duration::from_millis(10)).await;
        }
        panic!("external change was never picked up");
    }
}
