//! Built-in locale data: weekday, month and meridiem names.
//!
//! Weekday arrays are Sunday-first. `week_start` is the locale's first day
//! of the week (0 = Sunday) and only affects the `local_order` views; week
//! boundaries stay Sunday-based for every locale.

/// Names for one locale.
#[derive(Debug, PartialEq, Eq)]
pub struct LocaleData {
    pub tag: &'static str,
    pub weekdays: [&'static str; 7],
    pub weekdays_short: [&'static str; 7],
    pub weekdays_min: [&'static str; 7],
    pub months: [&'static str; 12],
    pub months_short: [&'static str; 12],
    pub week_start: usize,
    pub meridiem: [&'static str; 2],
}

pub static EN: LocaleData = LocaleData {
    tag: "en",
    weekdays: [
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
    ],
    weekdays_short: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
    weekdays_min: ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"],
    months: [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ],
    months_short: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
    week_start: 0,
    meridiem: ["AM", "PM"],
};

pub static ZH_CN: LocaleData = LocaleData {
    tag: "zh-cn",
    weekdays: [
        "星期日", "星期一", "星期二", "星期三", "星期四", "星期五", "星期六",
    ],
    weekdays_short: ["周日", "周一", "周二", "周三", "周四", "周五", "周六"],
    weekdays_min: ["日", "一", "二", "三", "四", "五", "六"],
    months: [
        "一月", "二月", "三月", "四月", "五月", "六月", "七月", "八月", "九月", "十月", "十一月",
        "十二月",
    ],
    months_short: [
        "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月", "12月",
    ],
    week_start: 1,
    meridiem: ["上午", "下午"],
};

pub static JA: LocaleData = LocaleData {
    tag: "ja",
    weekdays: [
        "日曜日", "月曜日", "火曜日", "水曜日", "木曜日", "金曜日", "土曜日",
    ],
    weekdays_short: ["日", "月", "火", "水", "木", "金", "土"],
    weekdays_min: ["日", "月", "火", "水", "木", "金", "土"],
    months: [
        "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月", "12月",
    ],
    months_short: [
        "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月", "12月",
    ],
    week_start: 0,
    meridiem: ["午前", "午後"],
};

pub static ES: LocaleData = LocaleData {
    tag: "es",
    weekdays: [
        "domingo",
        "lunes",
        "martes",
        "miércoles",
        "jueves",
        "viernes",
        "sábado",
    ],
    weekdays_short: ["dom.", "lun.", "mar.", "mié.", "jue.", "vie.", "sáb."],
    weekdays_min: ["do", "lu", "ma", "mi", "ju", "vi", "sá"],
    months: [
        "enero",
        "febrero",
        "marzo",
        "abril",
        "mayo",
        "junio",
        "julio",
        "agosto",
        "septiembre",
        "octubre",
        "noviembre",
        "diciembre",
    ],
    months_short: [
        "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
    ],
    week_start: 1,
    meridiem: ["a. m.", "p. m."],
};

static ALL: [&LocaleData; 4] = [&EN, &ZH_CN, &JA, &ES];

/// Map a user-supplied tag to the canonical built-in tag.
///
/// Matching ignores case and treats `_` like `-`. A region-qualified tag
/// falls back to its language when the region has no data of its own, so
/// `en-US` resolves to `en`.
pub fn canonical_tag(tag: &str) -> Option<&'static str> {
    let wanted = tag.trim().to_lowercase().replace('_', "-");
    if wanted.is_empty() {
        return None;
    }
    if let Some(data) = ALL.iter().find(|d| d.tag == wanted) {
        return Some(data.tag);
    }
    let language = wanted.split('-').next()?;
    ALL.iter().find(|d| d.tag == language).map(|d| d.tag)
}

/// Look up locale data, falling back to English for unknown tags.
pub fn data(tag: &str) -> &'static LocaleData {
    canonical_tag(tag)
        .and_then(|t| ALL.iter().find(|d| d.tag == t).copied())
        .unwrap_or(&EN)
}

/// Tags with built-in data.
pub fn available() -> Vec<&'static str> {
    ALL.iter().map(|d| d.tag).collect()
}

impl LocaleData {
    pub fn weekdays(&self, local_order: bool) -> Vec<String> {
        self.ordered(&self.weekdays, local_order)
    }

    pub fn weekdays_short(&self, local_order: bool) -> Vec<String> {
        self.ordered(&self.weekdays_short, local_order)
    }

    pub fn weekdays_min(&self, local_order: bool) -> Vec<String> {
        self.ordered(&self.weekdays_min, local_order)
    }

    pub fn months(&self) -> Vec<String> {
        self.months.iter().map(|s| s.to_string()).collect()
    }

    pub fn months_short(&self) -> Vec<String> {
        self.months_short.iter().map(|s| s.to_string()).collect()
    }

    /// Meridiem marker for an hour of the day (0-23).
    pub fn meridiem(&self, hour: u32) -> &'static str {
        if hour < 12 {
            self.meridiem[0]
        } else {
            self.meridiem[1]
        }
    }

    fn ordered(&self, names: &[&'static str; 7], local_order: bool) -> Vec<String> {
        let shift = if local_order { self.week_start % 7 } else { 0 };
        names[shift..]
            .iter()
            .chain(names[..shift].iter())
            .map(|s| s.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_tag() {
        assert_eq!(canonical_tag("en"), Some("en"));
        assert_eq!(canonical_tag("en-US"), Some("en"));
        assert_eq!(canonical_tag("zh-CN"), Some("zh-cn"));
        assert_eq!(canonical_tag("zh_cn"), Some("zh-cn"));
        assert_eq!(canonical_tag("ja"), Some("ja"));
        assert_eq!(canonical_tag("tlh"), None);
        assert_eq!(canonical_tag(""), None);
    }

    #[test]
    fn test_unknown_tag_falls_back_to_english() {
        assert_eq!(data("xx").tag, "en");
    }

    #[test]
    fn test_weekdays_local_order() {
        let zh = data("zh-cn");
        assert_eq!(zh.weekdays(false)[0], "星期日");
        assert_eq!(zh.weekdays(true)[0], "星期一");
        assert_eq!(zh.weekdays(true)[6], "星期日");

        let en = data("en");
        assert_eq!(en.weekdays(true), en.weekdays(false));
    }

    #[test]
    fn test_array_lengths() {
        for tag in available() {
            let d = data(tag);
            assert_eq!(d.weekdays(false).len(), 7);
            assert_eq!(d.weekdays_short(true).len(), 7);
            assert_eq!(d.weekdays_min(false).len(), 7);
            assert_eq!(d.months().len(), 12);
            assert_eq!(d.months_short().len(), 12);
        }
    }

    #[test]
    fn test_meridiem() {
        assert_eq!(EN.meridiem(0), "AM");
        assert_eq!(EN.meridiem(12), "PM");
        assert_eq!(ZH_CN.meridiem(15), "下午");
    }
}
