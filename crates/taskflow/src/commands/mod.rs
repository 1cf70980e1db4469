use std::str::FromStr;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use taskflow_app::{
    CategoryLink, Defaults, DueDatePatch, StoreError, TaskPatch, TaskQueryBuilder, TaskflowService,
    parse_due_date, parse_priority,
};
use taskflow_core::{CategoryId, CompletedStats, NewCategory, NewTask, Task, TaskId, TaskQuery};

use crate::Command;

mod render;

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletedReport {
    stats: CompletedStats,
    tasks: Vec<Task>,
}

#[derive(Serialize)]
struct Deleted {
    deleted: usize,
}

pub async fn run(
    command: Command,
    service: &TaskflowService,
    defaults: &Defaults,
    output: Output,
) -> Result<()> {
    match command {
        Command::List {
            status,
            priority,
            sort_by,
            order,
            category,
        } => {
            let query = list_query(
                defaults,
                status.as_deref(),
                priority.as_deref(),
                sort_by.as_deref(),
                order.as_deref(),
            )?;
            let tasks = match category {
                Some(raw) => {
                    service
                        .list_tasks_in(&parse_category_id(&raw)?, &query)
                        .await
                }
                None => service.list_tasks(&query).await,
            };
            let categories = service.categories().get_all().await;
            emit(output, &tasks, || {
                println!("{}", query.status.heading());
                render::task_table(&tasks, &categories);
            })
        }
        Command::Show { id } => {
            let id = parse_task_id(&id)?;
            let task = service
                .tasks()
                .get_by_id(&id)
                .await
                .ok_or(StoreError::TaskNotFound(id))?;
            let category = service.category_of(&task).await;
            emit(output, &task, || render::task_detail(&task, category.as_ref()))
        }
        Command::Add {
            title,
            description,
            category,
            priority,
            due,
        } => {
            let fields = new_task(
                defaults,
                title,
                description,
                category.as_deref(),
                priority.as_deref(),
                due.as_deref(),
            )?;
            let task = service.tasks().create(fields).await;
            emit(output, &task, || println!("Created task {}", task.id))
        }
        Command::Edit {
            id,
            title,
            description,
            category,
            clear_category,
            priority,
            due,
            clear_due,
        } => {
            let id = parse_task_id(&id)?;
            let category = if clear_category {
                Some(CategoryLink::Clear)
            } else {
                category
                    .as_deref()
                    .map(parse_category_id)
                    .transpose()?
                    .map(|category| CategoryLink::Set { category })
            };
            let due_date = if clear_due {
                Some(DueDatePatch::Clear)
            } else {
                due.as_deref()
                    .map(parse_due_date)
                    .transpose()?
                    .map(|due_date| DueDatePatch::Set { due_date })
            };
            let patch = TaskPatch {
                title: title.map(non_empty_title).transpose()?,
                description,
                category,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                due_date,
                completed: None,
            };
            if patch.is_empty() {
                bail!("Nothing to change for task {id}");
            }
            let task = service.tasks().update(&id, patch).await?;
            emit(output, &task, || println!("Updated task {}", task.id))
        }
        Command::Toggle { id } => {
            let task = service.tasks().toggle_complete(&parse_task_id(&id)?).await?;
            emit(output, &task, || {
                let state = if task.completed { "completed" } else { "pending" };
                println!("Task {} is now {state}", task.id);
            })
        }
        Command::Rm { ids } => {
            let ids = parse_task_ids(ids)?;
            let deleted = if let [id] = ids.as_slice() {
                service.tasks().delete(id).await?;
                1
            } else {
                service.tasks().bulk_delete(&ids).await
            };
            emit(output, &Deleted { deleted }, || {
                println!("Deleted {deleted} task(s)");
            })
        }
        Command::Search { query } => {
            let tasks = service.tasks().search(&query).await;
            let categories = service.categories().get_all().await;
            emit(output, &tasks, || render::task_table(&tasks, &categories))
        }
        Command::Stats => {
            let stats = service.tasks().get_stats().await;
            emit(output, &stats, || render::task_stats(&stats))
        }
        Command::Completed => {
            let report = CompletedReport {
                stats: service.completed_stats().await,
                tasks: service.tasks().get_completed().await,
            };
            let categories = service.categories().get_all().await;
            emit(output, &report, || {
                render::completed_stats(&report.stats);
                render::task_table(&report.tasks, &categories);
            })
        }
        Command::ClearCompleted => {
            let deleted = service.clear_completed().await;
            emit(output, &Deleted { deleted }, || {
                println!("Cleared {deleted} completed task(s)");
            })
        }
        Command::Categories => {
            let categories = service.categories_with_counts().await;
            emit(output, &categories, || render::category_table(&categories))
        }
        Command::CategoryAdd { name, color } => {
            let name = name.trim();
            if name.is_empty() {
                bail!("Category name must not be empty");
            }
            let fields = color.map_or_else(
                || NewCategory::named(name),
                |color| NewCategory::named(name).color(color),
            );
            let category = service.categories().create(fields).await;
            emit(output, &category, || {
                println!("Created category {} ({})", category.name, category.id);
            })
        }
        Command::CategoryRm { id } => {
            let id = parse_category_id(&id)?;
            let orphaned = service.delete_category(&id).await?;
            emit(output, &serde_json::json!({ "orphanedTasks": orphaned }), || {
                println!("Deleted category {id}; {orphaned} task(s) still reference it");
            })
        }
    }
}

fn emit<T: Serialize>(output: Output, value: &T, text: impl FnOnce()) -> Result<()> {
    match output {
        Output::Json => println!("{}", serde_json::to_string_pretty(value)?),
        Output::Text => text(),
    }
    Ok(())
}

fn list_query(
    defaults: &Defaults,
    status: Option<&str>,
    priority: Option<&str>,
    sort_by: Option<&str>,
    order: Option<&str>,
) -> Result<TaskQuery> {
    Ok(TaskQueryBuilder::from_query(defaults.query())
        .with_status(status)?
        .with_priority(priority)?
        .with_sort_by(sort_by)?
        .with_sort_order(order)?
        .build())
}

fn new_task(
    defaults: &Defaults,
    title: String,
    description: Option<String>,
    category: Option<&str>,
    priority: Option<&str>,
    due: Option<&str>,
) -> Result<NewTask> {
    let mut fields = NewTask::titled(non_empty_title(title)?)
        .priority(priority.map_or(Ok(defaults.priority), parse_priority)?);
    if let Some(description) = description {
        fields = fields.description(description);
    }
    if let Some(raw) = category {
        fields = fields.category(parse_category_id(raw)?);
    }
    if let Some(raw) = due {
        fields = fields.due(parse_due_date(raw)?);
    }
    Ok(fields)
}

fn non_empty_title(title: String) -> Result<String> {
    if title.trim().is_empty() {
        bail!("Task title must not be empty");
    }
    Ok(title)
}

fn parse_task_ids(inputs: Vec<String>) -> Result<Vec<TaskId>> {
    inputs.into_iter().map(|raw| parse_task_id(&raw)).collect()
}

fn parse_task_id(raw: &str) -> Result<TaskId> {
    TaskId::from_str(raw).with_context(|| format!("Invalid task id: {raw}"))
}

fn parse_category_id(raw: &str) -> Result<CategoryId> {
    CategoryId::from_str(raw).with_context(|| format!("Invalid category id: {raw}"))
}
