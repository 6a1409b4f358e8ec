//! Built-in filename patterns, tried strictly in order. Ordering encodes
//! priority: the most specific shapes (multi-episode spans, bracketed anime
//! releases) come first, catch-alls last.
//!
//! The capture names form the schema the record builders consume:
//! `seriesname`, `seasonnumber`, `episodenumber`, `episodenumber1`..N,
//! `episodenumberstart`/`episodenumberend`, `year`/`month`/`day`, `group`,
//! `crc` for TV; `movietitle`, `releasedate`, `resolution`, `releasetype`,
//! `extra` for movies.

pub const TV_PATTERNS: &[&str] = &[
    // [Group] Show - 01-02 [CRC]
    r"^\[(?P<group>.+?)\] ?(?P<seriesname>.*?) ?[-_] ?(?P<episodenumberstart>\d+)(?:[-_]\d+)*[-_](?P<episodenumberend>\d+)(?:[^/]*\[(?P<crc>[0-9A-Fa-f]+)\])?[^/]*$",
    // [Group] Show - 01 [CRC]
    r"^\[(?P<group>.+?)\] ?(?P<seriesname>.*) ?[-_] ?(?P<episodenumber>\d+)(?:[^/]*\[(?P<crc>[0-9A-Fa-f]+)\])?[^/]*$",
    // foo s01e23 s01e24 s01e25
    r"^(?:(?P<seriesname>.+?)[ ._-])?(?:[\[(]?(?P<year>[0-9]{4})[\])]? ?[ ._-] ?)?[Ss](?P<seasonnumber>[0-9]+)[.\- ]?[Ee](?P<episodenumberstart>[0-9]+)(?:[.\- ]+[Ss][0-9]+[.\- ]?[Ee][0-9]+)*[.\- ]+[Ss][0-9]+[.\- ]?[Ee](?P<episodenumberend>[0-9]+)[^/]*$",
    // foo.s01e23e24
    r"^(?:(?P<seriesname>.+?)[ ._-])?(?:[\[(]?(?P<year>[0-9]{4})[\])]? ?[ ._-] ?)?[Ss](?P<seasonnumber>[0-9]+)[.\- ]?[Ee](?P<episodenumberstart>[0-9]+)(?:[.\- ]?[Ee][0-9]+)*[.\- ]?[Ee](?P<episodenumberend>[0-9]+)[^/]*$",
    // foo.1x23 1x24 1x25
    r"^(?:(?P<seriesname>.+?)[ ._-])?(?:[\[(]?(?P<year>[0-9]{4})[\])]? ?[ ._-] ?)?(?P<seasonnumber>[0-9]+)[xX](?P<episodenumberstart>[0-9]+)(?:[ ._-]+[0-9]+[xX][0-9]+)*[ ._-]+[0-9]+[xX](?P<episodenumberend>[0-9]+)[^/]*$",
    // foo.1x23x24
    r"^(?:(?P<seriesname>.+?)[ ._-])?(?:[\[(]?(?P<year>[0-9]{4})[\])]? ?[ ._-] ?)?(?P<seasonnumber>[0-9]+)[xX](?P<episodenumberstart>[0-9]+)(?:[xX][0-9]+)*[xX](?P<episodenumberend>[0-9]+)[^/]*$",
    // foo.s01e23-24 (trailing separator required, so s01e01-720p is not 720 episodes)
    r"^(?:(?P<seriesname>.+?)[ ._-])?(?:[\[(]?(?P<year>[0-9]{4})[\])]? ?[ ._-] ?)?[Ss](?P<seasonnumber>[0-9]+)[.\- ]?[Ee](?P<episodenumberstart>[0-9]+)(?:-[Ee]?[0-9]+)*-[Ee]?(?P<episodenumberend>[0-9]+)[.\- ][^/]*$",
    // foo.1x23-24
    r"^(?:(?P<seriesname>.+?)[ ._-])?(?:[\[(]?(?P<year>[0-9]{4})[\])]? ?[ ._-] ?)?(?P<seasonnumber>[0-9]+)[xX](?P<episodenumberstart>[0-9]+)(?:[-+][0-9]+)*[-+](?P<episodenumberend>[0-9]+)(?:[.\-+ ][^/]*)?$",
    // foo.[1x09-11]
    r"^(?P<seriesname>.+?)[ ._-](?:[\[(]?(?P<year>[0-9]{4})[\])]? ?[ ._-] ?)?\[(?P<seasonnumber>[0-9]+)[xX](?P<episodenumberstart>[0-9]+)(?:[-+][0-9]+)*[-+](?P<episodenumberend>[0-9]+)\][^/]*$",
    // foo_[s01]_[e01]_[e02]
    r"^(?P<seriesname>.+?)[ ._-]\[[Ss](?P<seasonnumber>[0-9]+)\][ ._-]?\[[Ee](?P<episodenumber1>[0-9]+)\](?:[ ._-]?\[[Ee](?P<episodenumber2>[0-9]+)\])?[^/]*$",
    // foo - [012]
    r"^(?:(?P<seriesname>.+?)[ ._-])?(?:[\[(]?(?P<year>[0-9]{4})[\])]? ?[ ._-] ?)?\[(?P<episodenumber>[0-9]+)\][^/]*$",
    // foo.s0101, foo.s0201
    r"^(?P<seriesname>.+?)[ ._-](?:[\[(]?(?P<year>[0-9]{4})[\])]?[ ._-])?[Ss](?P<seasonnumber>[0-9]{2})[.\- ]?(?P<episodenumber>[0-9]{2})[^0-9]*$",
    // foo.1x09
    r"^(?:(?P<seriesname>.+?)[ ._-])?(?:[\[(]?(?P<year>[0-9]{4})[\])]? ?[ ._-] ?)?\[?(?P<seasonnumber>[0-9]+)[xX](?P<episodenumber>[0-9]+)\]?[^/]*$",
    // foo.s01.e01, foo.s01_e01, foo.s01 - e01
    r"^(?:(?P<seriesname>.+?)[ ._-])?(?:[\[(]?(?P<year>[0-9]{4})[\])]? ?[ ._-] ?)?\[?[Ss](?P<seasonnumber>[0-9]+) ?[._\- ]? ?[Ee]?(?P<episodenumber>[0-9]+)\]?[^/]*$",
    // foo.2010.01.02.etc (date-based)
    r"^(?:(?P<seriesname>.+?)[ ._-])?(?P<year>\d{4})[ ._-](?P<month>\d{2})[ ._-](?P<day>\d{2})[^/]*$",
    // foo - [01.09]
    r"^(?P<seriesname>.+?)[ ._-]?(?:[\[(]?(?P<year>[0-9]{4})[\])]? ?[ ._-] ?)?\[(?P<seasonnumber>[0-9]+?)[.](?P<episodenumber>[0-9]+?)\][ ._-]?[^/]*$",
    // Foo - S2 E 02
    r"^(?P<seriesname>.+?) ?[ ._-] ?(?:[\[(]?(?P<year>[0-9]{4})[\])]? ?[ ._-] ?)?[Ss](?P<seasonnumber>[0-9]+)[.\- ]?[Ee]? ?(?P<episodenumber>[0-9]+)[^/]*$",
    // Show - Episode 9999 [S 12 - Ep 131]
    r"^(?P<seriesname>.+?) - [Ee]pisode \d+ \[[Ss] ?(?P<seasonnumber>\d+)(?: - | |-)(?:[Ee]p?) ?(?P<episodenumber>\d+)\].*$",
    // show name 2 of 6
    r"^(?P<seriesname>.+?)[ ._-](?:[\[(]?(?P<year>[0-9]{4})[\])]? ?[ ._-] ?)?(?P<episodenumber>[0-9]+)[ ._-]?of[ ._-]?\d+(?:[._ -][^/]*)?$",
    // Show.Name.Part.1.and.Part.2
    r"(?i)^(?P<seriesname>.+?)[ ._-](?:[\[(]?(?P<year>[0-9]{4})[\])]? ?[ ._-] ?)?(?:part|pt)?[._ -](?P<episodenumberstart>[0-9]+)(?:[ ._-](?:and|&|to)[ ._-](?:part|pt)?[ ._-][0-9]+)*[ ._-](?:and|&|to)[ ._-]?(?:part|pt)?[ ._-](?P<episodenumberend>[0-9]+)[._ -][^/]*$",
    // Show.Name.Part1
    r"^(?P<seriesname>.+?)[ ._-](?:[\[(]?(?P<year>[0-9]{4})[\])]? ?[ ._-] ?)?[Pp]art ?(?P<episodenumber>[0-9]+)(?:[._ -][^/]*)?$",
    // show name Season 01 Episode 20
    r"^(?P<seriesname>.+?) ?(?:[\[(]?(?P<year>[0-9]{4})[\])]? ?[ ._-] ?)?[Ss]eason ?(?P<seasonnumber>[0-9]+) ?[Ee]pisode ?(?P<episodenumber>[0-9]+)[^/]*$",
    // foo.103*
    r"^(?P<seriesname>.+)[ ._-](?:[\[(]?(?P<year>[0-9]{4})[\])]? ?[ ._-] ?)?(?P<seasonnumber>[0-9]{1,2})(?P<episodenumber>[0-9]{2})(?:[._ -][^/]*)?$",
    // foo.0103*
    r"^(?P<seriesname>.+)[ ._-](?:[\[(]?(?P<year>[0-9]{4})[\])]? ?[ ._-] ?)?(?P<seasonnumber>[0-9]{2})(?P<episodenumber>[0-9]{2,3})[._ -][^/]*$",
    // show.name.e123
    r"^(?P<seriesname>.+?)[ ._-](?:[\[(]?(?P<year>[0-9]{4})[\])]? ?[ ._-] ?)?[Ee](?P<episodenumber>[0-9]+)(?:[._ -][^/]*)?$",
];

pub const MOVIE_PATTERNS: &[&str] = &[
    // Title (2010) [720p] extra
    r"(?i)^(?P<movietitle>.+?)[ .+_-]*[\[(]?(?P<releasedate>(?:19|20)[0-9]{2})[\])]?[ .+_-]*[\[(]?(?P<resolution>(?:240|320|480|576|720|1080|2160|2304|4096)[ip])[\])]?[ .+_-]*(?P<extra>.*)$",
    // Title (2010) extra
    r"(?i)^(?P<movietitle>.+?)[ .+_-]*[\[(]?(?P<releasedate>(?:19|20)[0-9]{2})[\])]?[ .+_-]*(?P<extra>.*)$",
    // Title [Director's Cut] 1080p extra (no year)
    r"(?i)^(?P<movietitle>.+?)(?:[ .+_-](?P<releasetype>unrated|special[ .+_-]edition|director'?s[ .+_-]cut))?[ .+_-][\[(]?(?P<resolution>(?:240|320|480|576|720|1080|2160|2304|4096)[ip])[\])]?(?P<extra>[ .+_-]?.*)$",
    // Title 2010 / Title 720p (nothing after)
    r"(?i)^(?P<movietitle>.+?)[ .+_-]*(?:(?P<releasedate>(?:19|20)[0-9]{2})|(?P<resolution>(?:240|320|480|576|720|1080|2160|2304|4096)[ip]))$",
    // Title.BRRip.XviD... (rip tokens onward are extra; plain titles also land here)
    r"(?i)^(?P<movietitle>.+?)(?P<extra>[ .+_-](?:bluray|b[rd]rip|dvd[ .+_-]?(?:rip)?|[hx]264|xvid|divx|cd[0-9]+|unrated).*)?$",
];
