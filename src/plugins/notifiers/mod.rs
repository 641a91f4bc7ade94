// Notifier plugin implementations
pub mod feishu;

pub use feishu::FeishuNotifier;
