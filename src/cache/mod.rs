//! 对象缓存模块
//!
//! 缓存后端通过注册表按名称选择，内置 moka（内存）与 redis 两种实现。
//! 新增后端只需实现 [`ObjectCache`] 并调用 `declare_object_cache_plugin!`。

pub mod object_cache;
pub mod register;
pub mod traits;

pub use traits::{CacheResult, ObjectCache};

/// 声明并注册一个缓存插件
///
/// 在程序加载时通过 ctor 把构造函数注册到全局注册表中。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $plugin:ident) => {
        paste::paste! {
            #[ctor::ctor]
            fn [<__register_object_cache_ $plugin:snake>]() {
                $crate::cache::register::register_object_cache_plugin(
                    $name,
                    std::sync::Arc::new(|| {
                        Box::pin(async {
                            match $plugin::new() {
                                Ok(plugin) => {
                                    Ok(Box::new(plugin) as Box<dyn $crate::cache::ObjectCache>)
                                }
                                Err(e) => {
                                    Err($crate::errors::SchoolSystemError::cache_connection(e))
                                }
                            }
                        })
                            as $crate::cache::register::BoxedObjectCacheFuture
                    }),
                );
            }
        }
    };
}
