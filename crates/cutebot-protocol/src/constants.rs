//! 协议常量定义

/// 仿真消息通道名称
pub const SIM_TOPIC: &str = "robot";

/// Cutebot 产品 ID（写入每条 `state` 消息）
pub const CUTEBOT_PRODUCT_ID: u32 = 0x3818_d146;

/// 仿真器上报的巡线传感器数量（硬件固定布局）
///
/// 槽位顺序：外左、左、中、右、外右
pub const LINE_DETECTOR_COUNT: usize = 5;

/// 本平台使用的左侧巡线槽位
pub const LINE_SLOT_LEFT: usize = 1;

/// 本平台使用的右侧巡线槽位
pub const LINE_SLOT_RIGHT: usize = 3;

/// 哨兵值：尚未收到任何读数
pub const NO_READING: f64 = -1.0;

/// 电机速度范围（百分比）
pub const MOTOR_SPEED_MIN: f64 = -100.0;
pub const MOTOR_SPEED_MAX: f64 = 100.0;

/// 厘米转英寸系数
pub const CM_TO_INCH: f64 = 0.3937;
