use crate::error::Result;
use crate::services::virtual_device::VirtualKeyboard;
use crate::types::Keybind;

/// Воспроизвести сочетание: KeyDown для всех клавиш кроме последней, KeyPress для последней,
/// затем KeyUp в обратном порядке.
///
/// Первая же ошибка прерывает последовательность. Отпускать уже зажатые клавиши повторно
/// никто не пытается: после ошибки состояние клавиатуры может остаться несогласованным.
pub fn use_keybind(keyboard: &dyn VirtualKeyboard, keybind: &Keybind) -> Result<()> {
    let Some((last, held)) = keybind.codes().split_last() else {
        return Ok(());
    };

    for key in held {
        keyboard.key_down(*key)?;
    }
    keyboard.key_press(*last)?;
    for key in held.iter().rev() {
        keyboard.key_up(*key)?;
    }

    Ok(())
}
