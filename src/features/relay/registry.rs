/// 上传器白名单：启动时从配置构建，保序、只读。
///
/// 白名单是本服务唯一的“业务规则”——名称本身对服务不透明，
/// 命中后原样转发给上游，由对端决定具体图床的接入方式。
#[derive(Debug, Clone)]
pub struct UploaderRegistry {
    names: Vec<String>,
}

impl UploaderRegistry {
    /// 由配置的名称列表构建；空串与重复项被丢弃（保留首次出现的顺序）。
    pub fn new(names: Vec<String>) -> Self {
        let mut deduped: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            if name.is_empty() || deduped.contains(&name) {
                continue;
            }
            deduped.push(name);
        }
        Self { names: deduped }
    }

    /// 判断名称是否在白名单内（大小写敏感的精确匹配）
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// 白名单名称，顺序与 `/list` 返回一致
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::UploaderRegistry;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn keeps_configured_order() {
        let registry = UploaderRegistry::new(strings(&["gofile", "anonfiles", "pixeldrain"]));
        assert_eq!(registry.names(), &strings(&["gofile", "anonfiles", "pixeldrain"])[..]);
    }

    #[test]
    fn drops_duplicates_and_empty_entries() {
        let registry = UploaderRegistry::new(strings(&["gofile", "", "gofile", "mixdrop"]));
        assert_eq!(registry.names(), &strings(&["gofile", "mixdrop"])[..]);
        assert!(!registry.contains(""));
    }

    #[test]
    fn membership_is_case_sensitive() {
        let registry = UploaderRegistry::new(strings(&["gofile"]));
        assert!(registry.contains("gofile"));
        assert!(!registry.contains("GoFile"));
        assert!(!registry.contains("gofile "));
    }
}
