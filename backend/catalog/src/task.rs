use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{Report, ValidationError};

pub const DEFAULT_ASSIGNEE: &str = "Unassigned";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    Testing,
    Completed,
}

impl Status {
    pub const ALL: [Status; 4] = [Self::ToDo, Self::InProgress, Self::Testing, Self::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "To Do",
            Self::InProgress => "In Progress",
            Self::Testing => "Testing",
            Self::Completed => "Completed",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub task_name: String,
    pub description: String,
    pub assigned_to: String,
    pub priority: Priority,
    pub status: Status,
    pub estimated_hours: f64,
    pub technology: String,
    pub created_at: DateTime<Utc>,
}

/// Writable task fields. Absent fields keep their default on create and
/// their current value on update; unknown keys are dropped by serde.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub task_name: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub estimated_hours: Option<f64>,
    pub technology: Option<String>,
}

impl Task {
    pub fn create(input: TaskInput, id: Uuid, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let has_name = input
            .task_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty());
        if !has_name {
            return Err(ValidationError::MissingField("Task name is required"));
        }

        let blank = Self {
            id,
            task_name: String::new(),
            description: String::new(),
            assigned_to: DEFAULT_ASSIGNEE.to_string(),
            priority: Priority::default(),
            status: Status::default(),
            estimated_hours: 0.0,
            technology: String::new(),
            created_at: now,
        };

        blank.apply(input)
    }

    /// Overlays `input` and validates the whole task.
    pub fn apply(&self, input: TaskInput) -> Result<Self, ValidationError> {
        let mut report = Report::default();
        let mut task = self.clone();

        if let Some(name) = input.task_name {
            task.task_name = name.trim().to_string();
        }
        if let Some(description) = input.description {
            task.description = description.trim().to_string();
        }
        if let Some(assigned_to) = input.assigned_to {
            task.assigned_to = assigned_to.trim().to_string();
        }
        if let Some(technology) = input.technology {
            task.technology = technology.trim().to_string();
        }
        if let Some(priority) = input.priority {
            match Priority::parse(priority.trim()) {
                Some(priority) => task.priority = priority,
                None => report.fail(format!(
                    "Priority must be one of: {}",
                    Priority::ALL.map(Priority::as_str).join(", ")
                )),
            }
        }
        if let Some(status) = input.status {
            match Status::parse(status.trim()) {
                Some(status) => task.status = status,
                None => report.fail(format!(
                    "Status must be one of: {}",
                    Status::ALL.map(Status::as_str).join(", ")
                )),
            }
        }
        if let Some(hours) = input.estimated_hours {
            task.estimated_hours = hours;
        }

        if task.task_name.is_empty() {
            report.fail("Task name is required");
        } else if task.task_name.chars().count() > 100 {
            report.fail("Task name cannot exceed 100 characters");
        }

        if task.description.chars().count() > 500 {
            report.fail("Description cannot exceed 500 characters");
        }

        if !task.estimated_hours.is_finite() {
            report.fail("Estimated hours must be a number");
        } else if task.estimated_hours < 0.0 {
            report.fail("Estimated hours cannot be negative");
        }

        report.finish()?;

        Ok(task)
    }
}
