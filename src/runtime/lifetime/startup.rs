use crate::cache::{ObjectCache, RevocationList};
use crate::cache::register::{get_object_cache_plugin, register_builtin_plugins};
use crate::config::AppConfig;
use crate::errors::{AttendanceError, Result};
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, warn};

const FALLBACK_CACHE: &str = "moka";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub revocations: RevocationList,
}

async fn build_cache(name: &str) -> Result<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name).ok_or_else(|| {
        AttendanceError::cache_plugin_not_found(format!("Cache backend '{name}' not found in registry"))
    })?;
    Ok(Arc::from(constructor().await?))
}

/// 按配置创建缓存，失败时回退到内存缓存
pub async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = &AppConfig::get().cache.cache_type;
    warn!("Attempting to create {} cache backend", cache_type);

    match build_cache(cache_type).await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", cache_type);
            Ok(cache)
        }
        Err(e) if cache_type != FALLBACK_CACHE => {
            warn!("Failed to create {} cache: {}. Falling back to memory cache", cache_type, e);
            build_cache(FALLBACK_CACHE).await
        }
        Err(e) => Err(e),
    }
}

/// 准备服务器启动的上下文：数据库连接池与对象缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // 已安装过时返回 Err，可以忽略
    let _ = rustls::crypto::ring::default_provider().install_default();

    register_builtin_plugins();
    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage().await?;
    match storage.ping().await {
        Ok(()) => warn!("Storage backend initialized"),
        Err(e) => warn!("Storage backend created but ping failed: {}", e),
    }

    let cache = create_cache().await?;
    // 单独的实例，formload 数据不会挤掉吊销记录
    let revocations = RevocationList::new(create_cache().await?);
    warn!("Cache backend initialized");

    Ok(StartupContext {
        storage,
        cache,
        revocations,
    })
}
