//! Markdown rendering of GitHub events for WeCom.
//!
//! Rendering is pure: it decides whether an event is worth a message and
//! builds the text, but never talks to the network.

use chrono::SecondsFormat;

use crate::error::RelayError;
use crate::events::{
    Account, AccountKind, CheckRunEvent, GitHubEvent, IssuesEvent, PingEvent, PullRequestEvent,
    Repository,
};

/// WeCom markdown labels for GitHub action names.
pub const ACTION_LABELS: &[(&str, &str)] = &[
    ("opened", "<font color='info'>创建</font>"),
    ("closed", "<font color='warning'>关闭</font>"),
    ("reopened", "<font color='info'>重新发起</font>"),
    ("edited", "<font color='info'>更新</font>"),
    ("merge", "<font color='warning'>合并</font>"),
    ("created", "<font color='info'>创建</font>"),
    ("requested", "<font color='info'>请求</font>"),
    ("completed", "<font color='warning'>完成</font>"),
    ("synchronize", "<font color='info'>同步更新</font>"),
];

/// Label for `action`, or the action itself when it has none.
#[must_use]
pub fn action_label(action: &str) -> &str {
    ACTION_LABELS
        .iter()
        .find(|(name, _)| *name == action)
        .map_or(action, |&(_, label)| label)
}

/// Result of rendering one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Markdown to deliver to the chat group
    Message(String),
    /// Nothing to deliver; the text explains why
    Skipped(String),
}

/// Render an event.
///
/// # Errors
///
/// Returns [`RelayError::MissingField`] when the branch selected by the
/// event needs a field the payload does not carry.
pub fn render(event: &GitHubEvent) -> Result<Rendered, RelayError> {
    match event {
        GitHubEvent::Ping(ping) => render_ping(ping),
        GitHubEvent::PullRequest(pr) => render_pull_request(pr),
        GitHubEvent::Issues(issue) => Ok(render_issue(issue)),
        GitHubEvent::CheckRun(run) => Ok(render_check_run(run)),
        GitHubEvent::Unsupported(name) => Ok(Rendered::Skipped(format!("暂不支持处理 {name} 事件"))),
    }
}

fn render_ping(event: &PingEvent) -> Result<Rendered, RelayError> {
    let message = if event.hook.is_organization() {
        let org = event.organization.as_ref().ok_or(RelayError::MissingField {
            event: "ping",
            field: "organization",
        })?;
        format!("成功收到了来自 Github 的 Ping 请求，组织: {}", org.login)
    } else {
        let repo = event.repository.as_ref().ok_or(RelayError::MissingField {
            event: "ping",
            field: "repository",
        })?;
        format!("成功收到了来自 Github 的 Ping 请求，仓库地址: {}", repo.html_url)
    };

    Ok(Rendered::Message(message))
}

fn render_pull_request(event: &PullRequestEvent) -> Result<Rendered, RelayError> {
    let PullRequestEvent {
        action,
        sender,
        pull_request: pr,
        repository,
    } = event;

    if sender.kind == AccountKind::Bot {
        return Ok(not_handled(sender.kind.as_str()));
    }

    let summary = |label: &str| {
        format!(
            "{} 在 {} {label}了一个 PR:\n\
             > 分支: {} → {}\n\
             > 名称: [{}]({}) #{}\n\
             > 修改: {} 个文件 (<font color=\"info\">+ {}</font> <font color=\"warning\">- {}</font> 行修改)",
            sender.login,
            repo_link(repository),
            pr.head.ref_name,
            pr.base.ref_name,
            pr.title,
            pr.html_url,
            pr.number,
            pr.changed_files,
            pr.additions,
            pr.deletions,
        )
    };

    match action.as_str() {
        "opened" | "reopened" => Ok(Rendered::Message(summary(action_label(action)))),
        "closed" if pr.is_merged() => {
            let merged_by = pr.merged_by.as_ref().ok_or(RelayError::MissingField {
                event: "pull_request",
                field: "pull_request.merged_by",
            })?;
            Ok(Rendered::Message(format!(
                "{}\n> 发起: {} ({})\n> 审核: {} ({} 条意见)",
                summary(action_label("merge")),
                pr.user.login,
                pr.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                merged_by.login,
                pr.review_comments,
            )))
        }
        _ => Ok(not_handled(action)),
    }
}

fn render_issue(event: &IssuesEvent) -> Rendered {
    let IssuesEvent {
        action,
        sender,
        issue,
        repository,
    } = event;

    match action.as_str() {
        "opened" | "closed" | "reopened" => Rendered::Message(format!(
            "{}在 {} {}了一个 Issues:\n> 名称: [{}]({})",
            actor(sender.as_ref()),
            repo_link(repository),
            action_label(action),
            issue.title,
            issue.html_url,
        )),
        _ => not_handled(action),
    }
}

fn render_check_run(event: &CheckRunEvent) -> Rendered {
    let CheckRunEvent {
        action,
        sender,
        check_run: run,
        repository,
    } = event;

    if action == "completed" && run.failed() {
        Rendered::Message(format!(
            "{}在 {} 中触发的 GitHub Action 执行<font color=\"warning\">失败</font>了:\n\
             > 查看状态: [{}]({})\n\
             > 错误信息: {}",
            actor(sender.as_ref()),
            repo_link(repository),
            run.name,
            run.html_url,
            run.output.summary.as_deref().unwrap_or("无"),
        ))
    } else {
        Rendered::Skipped(format!(
            "{action}({}) 暂时不会被处理",
            run.conclusion.as_deref().unwrap_or("none")
        ))
    }
}

fn not_handled(what: &str) -> Rendered {
    Rendered::Skipped(format!("{what} 操作暂时不会被处理"))
}

fn repo_link(repository: &Repository) -> String {
    format!("[{}]({})", repository.full_name, repository.html_url)
}

/// Sender login followed by a space, or nothing when the payload has no sender.
fn actor(sender: Option<&Account>) -> String {
    sender.map(|s| format!("{} ", s.login)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn parse(event_type: &str, value: &Value) -> GitHubEvent {
        GitHubEvent::parse(event_type, &serde_json::to_vec(value).unwrap()).unwrap()
    }

    fn message(rendered: Rendered) -> String {
        match rendered {
            Rendered::Message(text) => text,
            Rendered::Skipped(reason) => panic!("expected a message, got skip: {reason}"),
        }
    }

    fn repository() -> Value {
        json!({
            "full_name": "octo/hello",
            "html_url": "https://github.com/octo/hello"
        })
    }

    fn pull_request(action: &str, sender_kind: &str, merged: bool) -> Value {
        let merged_by = if merged {
            json!({ "login": "carol", "type": "User" })
        } else {
            Value::Null
        };

        json!({
            "action": action,
            "sender": { "login": "alice", "type": sender_kind },
            "repository": repository(),
            "pull_request": {
                "number": 42,
                "title": "Add relay",
                "html_url": "https://github.com/octo/hello/pull/42",
                "head": { "ref": "feature/relay" },
                "base": { "ref": "main" },
                "user": { "login": "bob", "type": "User" },
                "created_at": "2024-03-01T08:00:00Z",
                "merged": merged,
                "merged_by": merged_by,
                "changed_files": 3,
                "additions": 120,
                "deletions": 7,
                "review_comments": 5
            }
        })
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(action_label("opened"), "<font color='info'>创建</font>");
        assert_eq!(action_label("merge"), "<font color='warning'>合并</font>");
        assert_eq!(action_label("labeled"), "labeled");
    }

    #[test]
    fn test_ping_organization_names_org() {
        let event = parse(
            "ping",
            &json!({ "hook": { "type": "Organization" }, "organization": { "login": "octo-org" } }),
        );
        assert_eq!(
            message(render(&event).unwrap()),
            "成功收到了来自 Github 的 Ping 请求，组织: octo-org"
        );
    }

    #[test]
    fn test_ping_repository_names_repo_url() {
        let event = parse(
            "ping",
            &json!({ "hook": { "type": "Repository" }, "repository": repository() }),
        );
        assert_eq!(
            message(render(&event).unwrap()),
            "成功收到了来自 Github 的 Ping 请求，仓库地址: https://github.com/octo/hello"
        );
    }

    #[test]
    fn test_ping_organization_without_org_is_missing_field() {
        let event = parse("ping", &json!({ "hook": { "type": "Organization" } }));
        assert!(matches!(
            render(&event),
            Err(RelayError::MissingField { field: "organization", .. })
        ));
    }

    #[test]
    fn test_pull_request_opened_by_human() {
        let event = parse("pull_request", &pull_request("opened", "User", false));
        let text = message(render(&event).unwrap());

        assert!(text.starts_with(
            "alice 在 [octo/hello](https://github.com/octo/hello) <font color='info'>创建</font>了一个 PR:"
        ));
        assert!(text.contains("> 分支: feature/relay → main"));
        assert!(text.contains("> 名称: [Add relay](https://github.com/octo/hello/pull/42) #42"));
        assert!(text.contains("3 个文件"));
        assert!(text.contains("+ 120"));
        assert!(text.contains("- 7"));
        assert!(!text.contains("审核"));
    }

    #[test]
    fn test_pull_request_reopened_uses_reopen_label() {
        let event = parse("pull_request", &pull_request("reopened", "User", false));
        assert!(message(render(&event).unwrap()).contains("重新发起</font>了一个 PR"));
    }

    #[test]
    fn test_pull_request_merged_reports_merger_and_reviews() {
        let event = parse("pull_request", &pull_request("closed", "User", true));
        let text = message(render(&event).unwrap());

        assert!(text.contains("<font color='warning'>合并</font>了一个 PR:"));
        assert!(text.contains("> 发起: bob (2024-03-01T08:00:00Z)"));
        assert!(text.contains("> 审核: carol (5 条意见)"));
    }

    #[test]
    fn test_pull_request_closed_unmerged_is_not_handled() {
        let event = parse("pull_request", &pull_request("closed", "User", false));
        assert_eq!(
            render(&event).unwrap(),
            Rendered::Skipped("closed 操作暂时不会被处理".to_string())
        );
    }

    #[test]
    fn test_pull_request_from_bot_is_not_handled() {
        let event = parse("pull_request", &pull_request("opened", "Bot", false));
        assert_eq!(
            render(&event).unwrap(),
            Rendered::Skipped("Bot 操作暂时不会被处理".to_string())
        );
    }

    #[test]
    fn test_pull_request_other_action_is_not_handled() {
        let event = parse("pull_request", &pull_request("synchronize", "User", false));
        assert_eq!(
            render(&event).unwrap(),
            Rendered::Skipped("synchronize 操作暂时不会被处理".to_string())
        );
    }

    #[test]
    fn test_pull_request_merged_without_merger_is_missing_field() {
        let mut payload = pull_request("closed", "User", true);
        payload["pull_request"]["merged_by"] = Value::Null;
        let event = parse("pull_request", &payload);
        assert!(matches!(
            render(&event),
            Err(RelayError::MissingField {
                field: "pull_request.merged_by",
                ..
            })
        ));
    }

    #[test]
    fn test_issue_opened() {
        let event = parse(
            "issues",
            &json!({
                "action": "opened",
                "sender": { "login": "alice", "type": "User" },
                "repository": repository(),
                "issue": { "title": "Crash on ping", "html_url": "https://github.com/octo/hello/issues/3" }
            }),
        );
        assert_eq!(
            message(render(&event).unwrap()),
            "alice 在 [octo/hello](https://github.com/octo/hello) <font color='info'>创建</font>了一个 Issues:\n\
             > 名称: [Crash on ping](https://github.com/octo/hello/issues/3)"
        );
    }

    #[test]
    fn test_issue_without_sender_omits_login() {
        let event = parse(
            "issues",
            &json!({
                "action": "closed",
                "repository": repository(),
                "issue": { "title": "Crash on ping", "html_url": "https://github.com/octo/hello/issues/3" }
            }),
        );
        assert!(message(render(&event).unwrap()).starts_with("在 [octo/hello]"));
    }

    #[test]
    fn test_issue_edited_is_not_handled() {
        let event = parse(
            "issues",
            &json!({
                "action": "edited",
                "sender": { "login": "alice" },
                "repository": repository(),
                "issue": { "title": "t", "html_url": "u" }
            }),
        );
        assert_eq!(
            render(&event).unwrap(),
            Rendered::Skipped("edited 操作暂时不会被处理".to_string())
        );
    }

    #[test]
    fn test_check_run_failure() {
        let event = parse(
            "check_run",
            &json!({
                "action": "completed",
                "sender": { "login": "alice" },
                "repository": repository(),
                "check_run": {
                    "name": "clippy",
                    "html_url": "https://github.com/octo/hello/runs/9",
                    "conclusion": "failure",
                    "output": { "summary": "2 errors" }
                }
            }),
        );
        let text = message(render(&event).unwrap());
        assert!(text.starts_with("alice 在 [octo/hello](https://github.com/octo/hello) 中触发的"));
        assert!(text.contains("> 查看状态: [clippy](https://github.com/octo/hello/runs/9)"));
        assert!(text.ends_with("> 错误信息: 2 errors"));
    }

    #[test]
    fn test_check_run_success_is_skipped() {
        let event = parse(
            "check_run",
            &json!({
                "action": "completed",
                "repository": repository(),
                "check_run": { "name": "clippy", "html_url": "u", "conclusion": "success" }
            }),
        );
        assert_eq!(
            render(&event).unwrap(),
            Rendered::Skipped("completed(success) 暂时不会被处理".to_string())
        );
    }

    #[test]
    fn test_unsupported_event() {
        let event = GitHubEvent::Unsupported("push".to_string());
        assert_eq!(
            render(&event).unwrap(),
            Rendered::Skipped("暂不支持处理 push 事件".to_string())
        );
    }
}
