use crate::domain::model::RawRecord;
use crate::domain::ports::{CanvasClient, Page, QueryParam};
use crate::utils::error::{PulseError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum Scripted {
    Page(Page),
    Failure(u16),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub url: String,
    pub params: Option<Vec<QueryParam>>,
}

/// Canvas 假實作：以 URL 對應預先寫好的分頁或錯誤，並記錄每一次呼叫
///
/// Paths are used as URLs unchanged, so a route registered for
/// `/api/v1/courses` answers `get_paginated("/api/v1/courses", ..)`.
#[derive(Debug, Default)]
pub struct InMemoryCanvas {
    routes: HashMap<String, Scripted>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl InMemoryCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, body: RawRecord, next: Option<&str>) -> Self {
        let page = Page {
            body,
            next: next.map(str::to_string),
        };
        self.routes.insert(url.into(), Scripted::Page(page));
        self
    }

    /// Registers `pages` under `path`, `path?page=2`, `path?page=3`, ...
    pub fn with_pages(mut self, path: &str, pages: Vec<RawRecord>) -> Self {
        let count = pages.len();
        for (index, body) in pages.into_iter().enumerate() {
            let url = Self::page_url(path, index + 1);
            let next = (index + 1 < count).then(|| Self::page_url(path, index + 2));
            self.routes.insert(url, Scripted::Page(Page { body, next }));
        }
        self
    }

    pub fn with_failure(mut self, url: impl Into<String>, status: u16) -> Self {
        self.routes.insert(url.into(), Scripted::Failure(status));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn page_url(path: &str, page: usize) -> String {
        if page == 1 {
            path.to_string()
        } else {
            format!("{}?page={}", path, page)
        }
    }
}

#[async_trait]
impl CanvasClient for InMemoryCanvas {
    fn resolve_url(&self, path: &str) -> Result<String> {
        if path.trim().is_empty() {
            return Err(PulseError::ConfigError {
                message: "empty API path".to_string(),
            });
        }
        Ok(path.to_string())
    }

    async fn fetch_page(&self, url: &str, params: Option<&[QueryParam]>) -> Result<Page> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                url: url.to_string(),
                params: params.map(<[QueryParam]>::to_vec),
            });
        }

        match self.routes.get(url) {
            Some(Scripted::Page(page)) => Ok(page.clone()),
            Some(Scripted::Failure(status)) => Err(PulseError::HttpStatusError {
                status: *status,
                url: url.to_string(),
            }),
            None => Err(PulseError::HttpStatusError {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}
