//! 通知 ID 可信度判定
//!
//! 旧版微信使用从 4097 开始的计数器作为通知 ID，取消后会被复用，
//! 导致不同会话的通知互相覆盖。6.7.3（versionCode 1340）起每个会话使用独立 ID。
//! 无法确认版本时保守地视为"不可信"，由调用方改用标题哈希。

use tracing::{debug, warn};

use crate::host::NotificationHost;
use crate::notification::extras::EXTRA_APP_INFO;
use crate::notification::{ExtraValue, Notification};

/// 旧版计数器 ID 区间（不含下界）
const LEGACY_ID_RANGE_START: i32 = 4096;
/// 旧版计数器 ID 区间（含上界）
const LEGACY_ID_RANGE_END: i32 = 4100;
/// 支持独立 ID 的最低版本（微信 6.7.3）
const MIN_DISTINCT_ID_VERSION: i64 = 1340;

/// 独立 ID 支持状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DistinctIdSupport {
    #[default]
    Unknown,
    Supported,
    Unsupported,
}

/// 通知 ID 判定器，持有进程内缓存的版本探测结果
#[derive(Debug, Default)]
pub struct IdentityResolver {
    support: DistinctIdSupport,
}

impl IdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn support(&self) -> DistinctIdSupport {
        self.support
    }

    /// 判断 `id` 是否为会话独立的 ID
    ///
    /// - 已确认支持：直接返回 true
    /// - 已确认不支持且 ID 在旧版区间内：直接返回 false
    /// - 其他情况重新探测版本（覆盖运行期间升级的情况）
    pub fn is_distinct_id(&mut self, n: &Notification, package: &str, id: i32, host: &dyn NotificationHost) -> bool {
        match self.support {
            DistinctIdSupport::Supported => return true,
            DistinctIdSupport::Unsupported if Self::in_legacy_range(id) => return false,
            _ => {}
        }

        let version = Self::probe_version(n, package, host);
        if version == 0 {
            return false;
        }

        let supported = version >= MIN_DISTINCT_ID_VERSION;
        self.support = if supported {
            DistinctIdSupport::Supported
        } else {
            DistinctIdSupport::Unsupported
        };
        debug!(package = %package, version, supported, "Distinct notification ID probed");
        supported
    }

    fn in_legacy_range(id: i32) -> bool {
        id > LEGACY_ID_RANGE_START && id <= LEGACY_ID_RANGE_END
    }

    /// 读取发布方版本号，失败返回 0
    ///
    /// 重投递的通知会在 extras 中附带应用信息，包名一致时直接使用其中的版本号；
    /// 否则查询已安装应用信息。
    fn probe_version(n: &Notification, package: &str, host: &dyn NotificationHost) -> i64 {
        if let Some(ExtraValue::AppInfo {
            package_name,
            version_code: Some(version),
        }) = n.extras.get(EXTRA_APP_INFO)
        {
            if package_name == package && *version != 0 {
                return *version;
            }
        }

        match host.package_info(package) {
            Ok(info) => info.version_code,
            Err(e) => {
                warn!(package = %package, error = %e, "Failed to query package version");
                0
            }
        }
    }
}

/// 标题哈希，用作替代通知 ID
///
/// 对 UTF-16 码元做 31 进制多项式哈希（与发布方平台的字符串哈希一致），
/// 进程重启后结果不变，重投递仍能覆盖同一条通知。
pub fn title_hash(title: &str) -> i32 {
    title
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{InMemoryHost, PackageInfo};

    const PKG: &str = "com.tencent.mm";

    fn host_with_version(version_code: i64) -> InMemoryHost {
        let host = InMemoryHost::new();
        host.install_package(PKG, PackageInfo { version_code, target_sdk: 28 });
        host
    }

    #[test]
    fn test_title_hash_matches_platform_string_hash() {
        assert_eq!(title_hash(""), 0);
        assert_eq!(title_hash("a"), 97);
        assert_eq!(title_hash("Oasis"), 75_961_771);
        assert_eq!(title_hash("Oasis"), title_hash("Oasis"));
        assert_ne!(title_hash("Oasis"), title_hash("Group"));
    }

    #[test]
    fn test_supported_version_is_final() {
        let host = host_with_version(1360);
        let mut resolver = IdentityResolver::new();
        let n = Notification::new(0);

        assert!(resolver.is_distinct_id(&n, PKG, 4097, &host));
        assert_eq!(resolver.support(), DistinctIdSupport::Supported);

        host.install_package(PKG, PackageInfo { version_code: 1000, target_sdk: 28 });
        assert!(resolver.is_distinct_id(&n, PKG, 4097, &host));
        assert_eq!(host.package_queries(), 1);
    }

    #[test]
    fn test_unsupported_legacy_id_skips_probe() {
        let host = host_with_version(1300);
        let mut resolver = IdentityResolver::new();
        let n = Notification::new(0);

        assert!(!resolver.is_distinct_id(&n, PKG, 4097, &host));
        assert_eq!(resolver.support(), DistinctIdSupport::Unsupported);

        assert!(!resolver.is_distinct_id(&n, PKG, 4100, &host));
        assert_eq!(host.package_queries(), 1);
    }

    #[test]
    fn test_unsupported_reprobes_outside_legacy_range() {
        let host = host_with_version(1300);
        let mut resolver = IdentityResolver::new();
        let n = Notification::new(0);
        assert!(!resolver.is_distinct_id(&n, PKG, 4098, &host));

        // 运行期间升级
        host.install_package(PKG, PackageInfo { version_code: 1380, target_sdk: 28 });
        assert!(resolver.is_distinct_id(&n, PKG, 12_345, &host));
        assert_eq!(host.package_queries(), 2);
        assert_eq!(resolver.support(), DistinctIdSupport::Supported);
        assert!(resolver.is_distinct_id(&n, PKG, 4097, &host));
    }

    #[test]
    fn test_lookup_failure_stays_unknown() {
        let host = InMemoryHost::new();
        let mut resolver = IdentityResolver::new();
        let n = Notification::new(0);

        assert!(!resolver.is_distinct_id(&n, PKG, 100, &host));
        assert_eq!(resolver.support(), DistinctIdSupport::Unknown);
    }

    #[test]
    fn test_version_from_app_info_extra() {
        let host = InMemoryHost::new();
        let mut resolver = IdentityResolver::new();
        let mut n = Notification::new(0);
        n.extras.put(
            EXTRA_APP_INFO,
            ExtraValue::AppInfo { package_name: PKG.into(), version_code: Some(1400) },
        );

        assert!(resolver.is_distinct_id(&n, PKG, 4097, &host));
        assert_eq!(host.package_queries(), 0);
    }

    #[test]
    fn test_app_info_of_other_package_falls_back() {
        let host = host_with_version(1200);
        let mut resolver = IdentityResolver::new();
        let mut n = Notification::new(0);
        n.extras.put(
            EXTRA_APP_INFO,
            ExtraValue::AppInfo { package_name: "com.oasisfeng.nevolution".into(), version_code: Some(9000) },
        );

        assert!(!resolver.is_distinct_id(&n, PKG, 4097, &host));
        assert_eq!(host.package_queries(), 1);
    }
}
